//! Process-wide state: the track registry and service start time.

pub mod store;

pub use store::{AppState, RegistryEntry, TrackRegistry};
