//! # TTL Cache
//!
//! Explicit, bounded listing cache. Constructed by the caller and handed to
//! the aggregate service, so tests inject a fake clock instead of depending
//! on process-wide state. Entries expire by wall-clock TTL; capacity is
//! bounded LRU.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;
use std::num::NonZeroUsize;

struct Entry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Bounded cache with per-entry TTL. Time comes in through the call sites,
/// never from a global clock.
pub struct TtlCache<K: Hash + Eq, V: Clone> {
    entries: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    /// Cache holding at most `capacity` entries, each valid for `ttl_secs`.
    #[must_use]
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Returns the cached value if present and not past its TTL at `now`.
    /// Expired entries are evicted on the way out.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if now - entry.inserted_at < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value stamped with `now`.
    pub fn insert(&self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.lock().put(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
