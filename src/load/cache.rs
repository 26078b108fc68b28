// src/load/cache.rs

use crate::load::Loaded;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

/// Wall-clock source, injectable so expiry is testable without sleeping.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry {
    value: Loaded,
    fetched_at: DateTime<Utc>,
}

/// Time-to-live cache of loaded tables, keyed by tab name.
///
/// Owned by the `Loader`; there is no manual invalidation, entries only fall
/// out by expiry. One session, one loader, so no cross-fetch coordination is
/// attempted.
pub struct TtlCache {
    ttl: chrono::Duration,
    clock: Box<dyn Clock>,
    entries: HashMap<String, Entry>,
}

impl TtlCache {
    pub fn new(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::MAX);
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// A clone of the cached value, if present and younger than the TTL.
    pub fn get(&self, key: &str) -> Option<Loaded> {
        let entry = self.entries.get(key)?;
        let age = self.clock.now() - entry.fetched_at;
        if age < self.ttl {
            trace!(key, age_secs = age.num_seconds(), "cache hit");
            Some(entry.value.clone())
        } else {
            trace!(key, age_secs = age.num_seconds(), "cache expired");
            None
        }
    }

    pub fn put(&mut self, key: &str, value: Loaded) {
        let fetched_at = self.clock.now();
        self.entries.insert(key.to_string(), Entry { value, fetched_at });
    }
}
