//! In-memory track registry and application state.

use chrono::{DateTime, Utc};
use igc_core::models::Track;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fetch::{FetchError, TrackParser};

/// Prefix for minted synthetic track identifiers.
const ID_PREFIX: &str = "igc";

/// One registered track. Created on first successful parse of its URL,
/// never mutated or deleted afterwards.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub source_url: String,
    pub id: String,
    pub track: Track,
}

#[derive(Default)]
struct RegistryInner {
    by_url: HashMap<String, RegistryEntry>,
    /// Reverse index: synthetic ID to source URL.
    by_id: HashMap<String, String>,
    next_seq: u64,
}

/// Mapping from source URL to synthetic ID and parsed track.
///
/// One mutex owns the URL map, the reverse index and the ID counter
/// together: the dedup check and the counter increment on insert form a
/// single critical section, so two concurrent submissions of the same new
/// URL cannot mint two IDs.
pub struct TrackRegistry {
    inner: Mutex<RegistryInner>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_seq: 1,
                ..RegistryInner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // The registry holds no invariants a panicked holder could break
        // mid-update, so a poisoned lock is recovered rather than propagated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ID of an already-registered URL, if any.
    pub fn existing_id(&self, url: &str) -> Option<String> {
        self.lock().by_url.get(url).map(|entry| entry.id.clone())
    }

    /// Store a parsed track, minting the next ID.
    ///
    /// Re-checks for the URL under the lock: if another caller won the race
    /// between parse and insert, their ID is returned and the counter is
    /// left untouched.
    pub fn insert(&self, url: &str, track: Track) -> String {
        let mut inner = self.lock();
        if let Some(entry) = inner.by_url.get(url) {
            return entry.id.clone();
        }
        let id = format!("{ID_PREFIX}{}", inner.next_seq);
        inner.next_seq += 1;
        inner.by_id.insert(id.clone(), url.to_string());
        inner.by_url.insert(
            url.to_string(),
            RegistryEntry {
                source_url: url.to_string(),
                id: id.clone(),
                track,
            },
        );
        id
    }

    /// Resolve a synthetic ID to its entry via the reverse index.
    pub fn get(&self, id: &str) -> Option<RegistryEntry> {
        let inner = self.lock();
        let url = inner.by_id.get(id)?;
        inner.by_url.get(url).cloned()
    }

    /// All known IDs. Order is unspecified.
    pub fn ids(&self) -> Vec<String> {
        self.lock().by_id.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared by all handlers.
pub struct AppState {
    registry: TrackRegistry,
    parser: Arc<dyn TrackParser>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Captures the service start time; build this once at startup.
    pub fn new(parser: Arc<dyn TrackParser>) -> Self {
        Self {
            registry: TrackRegistry::new(),
            parser,
            started_at: Utc::now(),
        }
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    /// Seconds elapsed since the service started.
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Register a track URL, parsing it on first sight.
    ///
    /// Known URLs return their existing ID without re-fetching. Parse
    /// failures propagate without touching registry state. The parse runs
    /// outside the registry lock since it performs network I/O.
    pub async fn register_track(&self, url: &str) -> Result<String, FetchError> {
        if let Some(id) = self.registry.existing_id(url) {
            tracing::debug!("track {url} already registered as {id}");
            return Ok(id);
        }
        let track = self.parser.parse(url).await?;
        let id = self.registry.insert(url, track);
        tracing::info!("registered track {id} for {url}");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn track() -> Track {
        Track {
            pilot: "Jane Roe".to_string(),
            glider: "LS-4".to_string(),
            glider_id: "N-42".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 6, 3).unwrap(),
            points: Vec::new(),
        }
    }

    #[test]
    fn ids_are_monotonic_and_unique() {
        let registry = TrackRegistry::new();
        let first = registry.insert("http://example.com/a.igc", track());
        let second = registry.insert("http://example.com/b.igc", track());
        assert_eq!(first, "igc1");
        assert_eq!(second, "igc2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn reinserting_a_known_url_returns_the_existing_id() {
        let registry = TrackRegistry::new();
        let first = registry.insert("http://example.com/a.igc", track());
        let again = registry.insert("http://example.com/a.igc", track());
        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
        // The counter did not advance for the duplicate
        assert_eq!(registry.insert("http://example.com/b.igc", track()), "igc2");
    }

    #[test]
    fn reverse_lookup_resolves_minted_ids_only() {
        let registry = TrackRegistry::new();
        let id = registry.insert("http://example.com/a.igc", track());
        let entry = registry.get(&id).unwrap();
        assert_eq!(entry.source_url, "http://example.com/a.igc");
        assert_eq!(entry.track.pilot, "Jane Roe");
        assert!(registry.get("igc999").is_none());
    }

    #[test]
    fn ids_lists_every_entry() {
        let registry = TrackRegistry::new();
        assert!(registry.is_empty());
        registry.insert("http://example.com/a.igc", track());
        registry.insert("http://example.com/b.igc", track());
        let mut ids = registry.ids();
        ids.sort();
        assert_eq!(ids, vec!["igc1", "igc2"]);
    }
}
