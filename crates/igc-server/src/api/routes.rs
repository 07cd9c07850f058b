//! REST API routes and handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::ApiError;
use crate::state::AppState;
use igc_core::models::TrackField;
use igc_core::{format_iso8601, Track};

const SERVICE_INFO: &str = "Service for IGC tracks.";
const SERVICE_VERSION: &str = "v1";

/// Create the API router.
///
/// Unmatched paths fall through to axum's default 404 with an empty body,
/// which keeps dispatch total: every request maps to exactly one handler
/// or to not-found.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/igcinfo/api", get(service_info))
        .route("/igcinfo/api/igc", get(list_tracks).post(submit_track))
        .route("/igcinfo/api/igc/:id", get(track_detail))
        .route("/igcinfo/api/igc/:id/:field", get(track_field))
}

// === Request/Response types ===

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    url: String,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    uptime: String,
    info: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct TrackDetail {
    #[serde(rename = "H_date")]
    h_date: String,
    pilot: String,
    glider: String,
    glider_id: String,
    track_length: String,
}

impl TrackDetail {
    fn from_track(track: &Track) -> Self {
        Self {
            h_date: track.field_value(TrackField::HDate),
            pilot: track.field_value(TrackField::Pilot),
            glider: track.field_value(TrackField::Glider),
            glider_id: track.field_value(TrackField::GliderId),
            track_length: track.field_value(TrackField::TrackLength),
        }
    }
}

/// Synthetic IDs exposed over the API: 3 to 10 alphanumeric characters.
fn is_track_id(id: &str) -> bool {
    (3..=10).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

// === Handlers ===

async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        uptime: format_iso8601(state.uptime_seconds()),
        info: SERVICE_INFO.to_string(),
        version: SERVICE_VERSION.to_string(),
    })
}

async fn submit_track(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let id = state.register_track(&req.url).await.map_err(|err| {
        tracing::warn!("rejected track submission for {}: {err}", req.url);
        err
    })?;
    Ok(Json(SubmitResponse { id }))
}

async fn list_tracks(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.registry().ids())
}

async fn track_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TrackDetail>, ApiError> {
    if !is_track_id(&id) {
        return Err(ApiError::NotFound);
    }
    let entry = state.registry().get(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(TrackDetail::from_track(&entry.track)))
}

async fn track_field(
    State(state): State<Arc<AppState>>,
    Path((id, field)): Path<(String, String)>,
) -> Result<String, ApiError> {
    if !is_track_id(&id) {
        return Err(ApiError::NotFound);
    }
    let field: TrackField = field.parse().map_err(|_| ApiError::NotFound)?;
    let entry = state.registry().get(&id).ok_or(ApiError::NotFound)?;
    Ok(entry.track.field_value(field))
}
