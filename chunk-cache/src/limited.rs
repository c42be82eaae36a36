use std::hash::Hash;

use chunk_error::{ChunkError, Result};
use lru::LruCache;

use crate::ChunkCache;

/// A cache entry that stores a value and its size in bytes.
struct CacheEntry<V> {
    value: V,
    size: usize,
}

/// An in-memory cache bounded by the total size of its values.
///
/// Uses an LRU (Least Recently Used) eviction policy: when a new value
/// does not fit, the entries untouched for the longest time are dropped
/// until it does.
pub struct LruMemoryCache<K, V> {
    /// Label for logging
    label: String,
    memory_cache: LruCache<K, CacheEntry<V>>,
    /// The current memory usage in bytes.
    current_memory_bytes: usize,
    /// The maximum allowable memory usage in bytes.
    max_memory_bytes: usize,
}

impl<K, V> LruMemoryCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone + AsRef<[u8]>,
{
    /// Creates a new cache instance.
    ///
    /// # Arguments
    /// * `label` - Identifier used in logs
    /// * `max_memory_bytes` - Maximum bytes to keep in memory, must not be 0
    pub fn new(label: String, max_memory_bytes: usize) -> Result<Self> {
        if max_memory_bytes == 0 {
            return Err(ChunkError::Config(format!(
                "cache/{}: capacity can't be zero",
                label
            )));
        }

        log::debug!(
            "cache/{}: initialized with {} bytes limit",
            label,
            max_memory_bytes
        );

        Ok(Self {
            label,
            memory_cache: LruCache::unbounded(),
            current_memory_bytes: 0,
            max_memory_bytes,
        })
    }

    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_bytes
    }

    fn forget(&mut self, key: &K) {
        if let Some(old_entry) = self.memory_cache.pop(key) {
            self.current_memory_bytes -= old_entry.size;
        }
    }
}

impl<K, V> ChunkCache<K, V> for LruMemoryCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone + AsRef<[u8]>,
{
    fn get(&mut self, key: &K) -> Option<V> {
        let value = self
            .memory_cache
            .get(key)
            .map(|entry| entry.value.clone());
        if value.is_some() {
            log::trace!("cache/{}: hit for key {:?}", self.label, key);
        }
        value
    }

    /// Adds or updates a value, evicting old entries if needed.
    /// A value larger than the whole budget is not kept.
    fn put(&mut self, key: K, value: V) {
        let size = value.as_ref().len();

        // A stale value under the same key must not survive either way
        self.forget(&key);

        if size > self.max_memory_bytes {
            log::warn!(
                "cache/{}: value size {} exceeds limit {}",
                self.label,
                size,
                self.max_memory_bytes
            );
            return;
        }

        while self.current_memory_bytes + size > self.max_memory_bytes {
            match self.memory_cache.pop_lru() {
                Some((old_key, old_entry)) => {
                    log::debug!(
                        "cache/{}: evicted key {:?} ({} bytes)",
                        self.label,
                        old_key,
                        old_entry.size
                    );
                    self.current_memory_bytes = self
                        .current_memory_bytes
                        .saturating_sub(old_entry.size);
                }
                None => break,
            }
        }

        self.memory_cache.put(key, CacheEntry { value, size });
        self.current_memory_bytes += size;

        log::trace!(
            "cache/{}: added {} bytes, total {}/{}",
            self.label,
            size,
            self.current_memory_bytes,
            self.max_memory_bytes
        );
    }

    fn contains(&self, key: &K) -> bool {
        self.memory_cache.contains(key)
    }

    fn len(&self) -> usize {
        self.memory_cache.len()
    }

    fn memory_used(&self) -> usize {
        self.current_memory_bytes
    }

    fn clear(&mut self) {
        self.memory_cache.clear();
        self.current_memory_bytes = 0;
    }
}
