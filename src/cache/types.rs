use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope persisted to disk: the payload plus the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }

    /// Valid while `now - timestamp < ttl`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.timestamp) < ttl
    }
}

pub type RecommendationMap = BTreeMap<String, Vec<String>>;
