//! API error type and its response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown synthetic ID or field name. Renders as 404 with no body.
    #[error("not found")]
    NotFound,
    /// The submitted URL could not be fetched or parsed.
    #[error(transparent)]
    Parse(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Parse(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
        }
    }
}
