//! Client library for the IGC info service.

mod client;

pub use client::{IgcInfoClient, ServiceStatus, TrackDetail};
