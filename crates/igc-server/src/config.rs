//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Timeout for fetching a single track file, in seconds.
    pub fetch_timeout_s: u64,
    /// Upper bound on the size of a fetched track file.
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            fetch_timeout_s: env::var("IGC_FETCH_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            max_body_bytes: env::var("IGC_MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}
