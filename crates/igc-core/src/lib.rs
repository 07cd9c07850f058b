pub mod duration;
pub mod igc;
pub mod models;
pub mod spatial;

pub use duration::format_iso8601;
pub use igc::IgcError;
pub use models::{GeoPoint, Track, TrackField};
pub use spatial::{haversine_km, total_distance_km};
