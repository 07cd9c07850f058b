//! Minimal reader for the IGC flight-recorder text format.
//!
//! Covers the records the service projects: the `HFDTE` date header, the
//! `HFPLT`/`HFGTY`/`HFGID` metadata headers and `B` fix records. Everything
//! else in the file is skipped.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::{GeoPoint, Track};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IgcError {
    #[error("track file has no date header")]
    MissingDate,
    #[error("malformed record on line {line}")]
    BadRecord { line: usize },
    #[error("malformed coordinate on line {line}")]
    BadCoordinate { line: usize },
    #[error("malformed timestamp on line {line}")]
    BadTime { line: usize },
}

/// Parse the textual contents of an IGC file into a [`Track`].
///
/// A file without any `B` records is still a valid track; its distance is
/// simply zero. A file without a date header is rejected.
pub fn parse(input: &str) -> Result<Track, IgcError> {
    let mut pilot = String::new();
    let mut glider = String::new();
    let mut glider_id = String::new();
    let mut date: Option<NaiveDate> = None;
    let mut points = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if !line.is_ascii() {
            return Err(IgcError::BadRecord { line: line_no });
        }
        match line.as_bytes()[0] {
            b'H' | b'h' => {
                if line.len() < 5 {
                    continue;
                }
                // Byte 1 is the data source, bytes 2..5 the subject code.
                match &line[2..5] {
                    "DTE" => date = Some(parse_date(&line[5..], line_no)?),
                    "PLT" => pilot = header_value(line),
                    "GTY" => glider = header_value(line),
                    "GID" => glider_id = header_value(line),
                    _ => {}
                }
            }
            b'B' => points.push(parse_fix(line, line_no)?),
            _ => {}
        }
    }

    let date = date.ok_or(IgcError::MissingDate)?;
    Ok(Track {
        pilot,
        glider,
        glider_id,
        date,
        points,
    })
}

/// Value of a text header, e.g. `HFPLTPILOTINCHARGE:John Doe`.
fn header_value(line: &str) -> String {
    match line.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => line[5..].trim().to_string(),
    }
}

/// Date header payload: `DDMMYY`, possibly behind a `DATE:` long-form
/// prefix and followed by a flight number.
fn parse_date(rest: &str, line: usize) -> Result<NaiveDate, IgcError> {
    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).take(6).collect();
    if digits.len() < 6 {
        return Err(IgcError::BadRecord { line });
    }
    let day: u32 = digits[0..2].parse().map_err(|_| IgcError::BadRecord { line })?;
    let month: u32 = digits[2..4].parse().map_err(|_| IgcError::BadRecord { line })?;
    let year: i32 = digits[4..6].parse().map_err(|_| IgcError::BadRecord { line })?;
    NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or(IgcError::BadRecord { line })
}

/// B record layout (fixed columns):
/// `B HHMMSS DDMMmmm[NS] DDDMMmmm[EW] V PPPPP GGGGG ...`
fn parse_fix(line: &str, line_no: usize) -> Result<GeoPoint, IgcError> {
    if line.len() < 35 {
        return Err(IgcError::BadRecord { line: line_no });
    }

    let time = parse_time(&line[1..7], line_no)?;
    let lat = parse_angle(&line[7..14], &line[14..15], 90, line_no)?;
    let lon = parse_angle(&line[15..23], &line[23..24], 180, line_no)?;
    let pressure_altitude_m: f64 = line[25..30]
        .parse::<i32>()
        .map_err(|_| IgcError::BadRecord { line: line_no })? as f64;
    let altitude_m: f64 = line[30..35]
        .parse::<i32>()
        .map_err(|_| IgcError::BadRecord { line: line_no })? as f64;

    Ok(GeoPoint {
        lat,
        lon,
        altitude_m,
        pressure_altitude_m,
        time,
    })
}

fn parse_time(s: &str, line: usize) -> Result<NaiveTime, IgcError> {
    let hour: u32 = s[0..2].parse().map_err(|_| IgcError::BadTime { line })?;
    let min: u32 = s[2..4].parse().map_err(|_| IgcError::BadTime { line })?;
    let sec: u32 = s[4..6].parse().map_err(|_| IgcError::BadTime { line })?;
    NaiveTime::from_hms_opt(hour, min, sec).ok_or(IgcError::BadTime { line })
}

/// Coordinate in degrees and thousandths of minutes, e.g. `5206343` +
/// hemisphere `N`. Latitudes carry two degree digits, longitudes three.
fn parse_angle(body: &str, hemi: &str, max_deg: u32, line: usize) -> Result<f64, IgcError> {
    let deg_digits = body.len() - 5;
    let degrees: u32 = body[..deg_digits]
        .parse()
        .map_err(|_| IgcError::BadCoordinate { line })?;
    let milli_minutes: u32 = body[deg_digits..]
        .parse()
        .map_err(|_| IgcError::BadCoordinate { line })?;
    if degrees > max_deg {
        return Err(IgcError::BadCoordinate { line });
    }
    let value = degrees as f64 + milli_minutes as f64 / 1000.0 / 60.0;
    match hemi {
        "N" | "E" => Ok(value),
        "S" | "W" => Ok(-value),
        _ => Err(IgcError::BadCoordinate { line }),
    }
}
