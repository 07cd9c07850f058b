//! HTTP client for the IGC info service API.

use anyhow::Result;
use igc_core::models::TrackField;
use serde::{Deserialize, Serialize};

/// Client for talking to a running IGC info server.
pub struct IgcInfoClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

/// Service metadata from the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub uptime: String,
    pub info: String,
    pub version: String,
}

/// Full detail for one registered track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackDetail {
    #[serde(rename = "H_date")]
    pub h_date: String,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    pub track_length: String,
}

impl IgcInfoClient {
    /// Create a new client for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the service status (uptime, description, version).
    pub async fn status(&self) -> Result<ServiceStatus> {
        let url = format!("{}/igcinfo/api", self.base_url);
        let status: ServiceStatus = self.client.get(&url).send().await?.json().await?;
        Ok(status)
    }

    /// Submit a track file URL; returns the assigned track ID.
    ///
    /// Submitting an already-known URL returns its existing ID.
    pub async fn submit_track(&self, track_url: &str) -> Result<String> {
        let url = format!("{}/igcinfo/api/igc", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SubmitRequest { url: track_url })
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to submit track: {}", response.status());
        }

        let body: SubmitResponse = response.json().await?;
        Ok(body.id)
    }

    /// List the IDs of all registered tracks.
    pub async fn list_tracks(&self) -> Result<Vec<String>> {
        let url = format!("{}/igcinfo/api/igc", self.base_url);
        let ids: Vec<String> = self.client.get(&url).send().await?.json().await?;
        Ok(ids)
    }

    /// Fetch the full detail for one track ID.
    pub async fn track_detail(&self, id: &str) -> Result<TrackDetail> {
        let url = format!("{}/igcinfo/api/igc/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch track {}: {}", id, response.status());
        }

        let detail: TrackDetail = response.json().await?;
        Ok(detail)
    }

    /// Fetch a single field of one track as plain text.
    pub async fn track_field(&self, id: &str, field: TrackField) -> Result<String> {
        let url = format!("{}/igcinfo/api/igc/{}/{}", self.base_url, id, field.as_str());
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch field {} of track {}: {}",
                field,
                id,
                response.status()
            );
        }

        Ok(response.text().await?)
    }
}
