//! Time-boxed cache of generated insight text, stored under one key.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{keys, load_json, save_json, KeyValueStore, Result};

/// Persisted form: one timestamp for the whole set, refreshed on every write.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CachedInsights {
    /// Milliseconds since the epoch of the local wall-clock write time.
    pub timestamp: i64,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

pub struct InsightCache<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    ttl_ms: i64,
}

impl<'a, S: KeyValueStore + ?Sized> InsightCache<'a, S> {
    pub fn new(store: &'a S, ttl_secs: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_secs.saturating_mul(1_000)).unwrap_or(i64::MAX);
        Self { store, ttl_ms }
    }

    /// Every cached insight, or nothing once the set is older than the TTL.
    pub fn load(&self, now: NaiveDateTime) -> BTreeMap<String, String> {
        let cached: CachedInsights = match load_json(self.store, keys::AI_INSIGHTS) {
            Ok(Some(cached)) => cached,
            Ok(None) => return BTreeMap::new(),
            Err(err) => {
                warn!(error = %err, "cached insights unreadable");
                return BTreeMap::new();
            }
        };
        let age_ms = now.and_utc().timestamp_millis() - cached.timestamp;
        if age_ms < self.ttl_ms {
            cached.data
        } else {
            BTreeMap::new()
        }
    }

    pub fn get(&self, name: &str, now: NaiveDateTime) -> Option<String> {
        self.load(now).remove(name)
    }

    /// Adds `text` to the still-valid entries and restamps the set with `now`.
    pub fn put(&self, name: &str, text: &str, now: NaiveDateTime) -> Result<()> {
        let mut data = self.load(now);
        data.insert(name.to_string(), text.to_string());
        let cached = CachedInsights {
            timestamp: now.and_utc().timestamp_millis(),
            data,
        };
        save_json(self.store, keys::AI_INSIGHTS, &cached)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::AI_INSIGHTS)
    }
}
