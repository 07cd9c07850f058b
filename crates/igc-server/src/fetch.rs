//! Track-fetch collaborator: retrieve a track file by URL and parse it.

use async_trait::async_trait;
use igc_core::models::Track;
use igc_core::IgcError;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid track URL: {0}")]
    InvalidUrl(String),
    #[error("failed to fetch track: {0}")]
    Http(#[from] reqwest::Error),
    #[error("track host returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("track file exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to parse track: {0}")]
    Igc(#[from] IgcError),
}

/// Capability to turn a track URL into a parsed [`Track`].
///
/// Handlers and the registry only see this trait, so tests can substitute
/// a stub that never touches the network.
#[async_trait]
pub trait TrackParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<Track, FetchError>;
}

/// Production parser: GET the file over HTTP(S) and run the IGC reader.
pub struct HttpTrackParser {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpTrackParser {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_s))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl TrackParser for HttpTrackParser {
    async fn parse(&self, url: &str) -> Result<Track, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(parsed).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        if let Some(length) = response.content_length() {
            if length as usize > self.max_body_bytes {
                return Err(FetchError::TooLarge(self.max_body_bytes));
            }
        }

        let body = response.text().await?;
        if body.len() > self.max_body_bytes {
            return Err(FetchError::TooLarge(self.max_body_bytes));
        }

        let track = igc_core::igc::parse(&body)?;
        tracing::debug!(
            "parsed track from {url}: {} fixes, pilot {:?}",
            track.points.len(),
            track.pilot
        );
        Ok(track)
    }
}
