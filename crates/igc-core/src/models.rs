//! Core data models for parsed flight tracks.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::spatial;

/// A single recorded fix along a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    /// GPS altitude in meters.
    pub altitude_m: f64,
    /// Pressure altitude in meters.
    pub pressure_altitude_m: f64,
    pub time: NaiveTime,
}

/// A parsed flight track. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub pilot: String,
    /// Glider type, e.g. "ASK-21".
    pub glider: String,
    pub glider_id: String,
    /// Recording date from the file header.
    pub date: NaiveDate,
    /// Recorded fixes in file order. May be empty.
    pub points: Vec<GeoPoint>,
}

impl Track {
    /// Total great-circle distance over the recorded fixes, in kilometers.
    ///
    /// Zero when the track has fewer than two fixes.
    pub fn distance_km(&self) -> f64 {
        spatial::total_distance_km(&self.points)
    }

    /// Render one projectable field of the track.
    ///
    /// Both the full detail response and the single-field endpoint go
    /// through this accessor, so the two can never disagree.
    pub fn field_value(&self, field: TrackField) -> String {
        match field {
            TrackField::Pilot => self.pilot.clone(),
            TrackField::Glider => self.glider.clone(),
            TrackField::GliderId => self.glider_id.clone(),
            TrackField::TrackLength => format!("{:.2}", self.distance_km()),
            TrackField::HDate => self.date.to_string(),
        }
    }
}

/// The fixed set of fields a track exposes over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackField {
    Pilot,
    Glider,
    GliderId,
    TrackLength,
    HDate,
}

impl TrackField {
    pub const ALL: [TrackField; 5] = [
        TrackField::Pilot,
        TrackField::Glider,
        TrackField::GliderId,
        TrackField::TrackLength,
        TrackField::HDate,
    ];

    /// Wire name used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackField::Pilot => "pilot",
            TrackField::Glider => "glider",
            TrackField::GliderId => "glider_id",
            TrackField::TrackLength => "track_length",
            TrackField::HDate => "H_date",
        }
    }
}

impl fmt::Display for TrackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown field name in a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown track field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for TrackField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
