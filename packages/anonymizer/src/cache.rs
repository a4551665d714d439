//! Memoization cache for pure string functions.
//!
//! Token counts and normalized forms depend only on their input string, so
//! they can be cached by exact input. The cache is an explicit value that
//! callers create and inject; nothing here is process-global.
//!
//! Eviction: least recently used, once `capacity` entries are held.
//! [`MemoCache::unbounded`] never evicts and is meant for tests.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Thread-safe LRU cache keyed by input string.
///
/// The lock is held only for lookups and inserts, never while computing a
/// value. Two threads missing on the same key both compute it; the later
/// insert wins, which is harmless for pure functions.
pub struct MemoCache<V> {
    entries: Mutex<LruCache<String, V>>,
}

impl<V: Clone> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn bounded(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Create a cache that never evicts.
    pub fn unbounded() -> Self {
        Self {
            entries: Mutex::new(LruCache::unbounded()),
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&self, key: &str, compute: impl FnOnce() -> V) -> V {
        if let Ok(mut entries) = self.entries.lock() {
            if let Some(value) = entries.get(key) {
                return value.clone();
            }
        }

        let value = compute();

        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key.to_string(), value.clone());
        }
        value
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
