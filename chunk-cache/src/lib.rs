mod limited;
mod unbounded;

use std::hash::Hash;

use chunk_error::Result;

pub use crate::limited::LruMemoryCache;
pub use crate::unbounded::UnboundedCache;

/// Default memory budget of a chunk cache: 1 MiB.
pub const DEFAULT_CACHE_LIMIT: usize = 1024 * 1024;

/// A mapping from chunk keys to chunk buffers.
///
/// Implementations are free to drop entries at any time, so a successful
/// `put` does not guarantee that a later `get` will hit. Callers must be
/// ready to re-fetch.
pub trait ChunkCache<K, V> {
    /// Retrieves a value, marking it as recently used where that matters.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Stores a value, possibly evicting others or dropping this one.
    fn put(&mut self, key: K, value: V);

    /// Checks for a key without affecting eviction order.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently held by the cached values.
    fn memory_used(&self) -> usize;

    /// Drops every entry.
    fn clear(&mut self);
}

impl<K, V, C> ChunkCache<K, V> for &mut C
where
    C: ChunkCache<K, V> + ?Sized,
{
    fn get(&mut self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn put(&mut self, key: K, value: V) {
        (**self).put(key, value)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn memory_used(&self) -> usize {
        (**self).memory_used()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

impl<K, V, C> ChunkCache<K, V> for Box<C>
where
    C: ChunkCache<K, V> + ?Sized,
{
    fn get(&mut self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn put(&mut self, key: K, value: V) {
        (**self).put(key, value)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn memory_used(&self) -> usize {
        (**self).memory_used()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// The in-memory cache picked from a byte limit: a bounded LRU cache when
/// a limit is given, a plain map retaining everything otherwise.
pub enum MemoryCache<K, V> {
    Unbounded(UnboundedCache<K, V>),
    Limited(LruMemoryCache<K, V>),
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone + AsRef<[u8]>,
{
    /// Creates a cache holding at most `limit` bytes, or an unbounded one
    /// for `None`.
    pub fn new(label: String, limit: Option<usize>) -> Result<Self> {
        Ok(match limit {
            Some(max_memory_bytes) => {
                Self::Limited(LruMemoryCache::new(label, max_memory_bytes)?)
            }
            None => Self::Unbounded(UnboundedCache::new(label)),
        })
    }

    /// The byte budget, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Unbounded(_) => None,
            Self::Limited(cache) => Some(cache.max_memory_bytes()),
        }
    }
}

impl<K, V> ChunkCache<K, V> for MemoryCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone + AsRef<[u8]>,
{
    fn get(&mut self, key: &K) -> Option<V> {
        match self {
            Self::Unbounded(cache) => cache.get(key),
            Self::Limited(cache) => cache.get(key),
        }
    }

    fn put(&mut self, key: K, value: V) {
        match self {
            Self::Unbounded(cache) => cache.put(key, value),
            Self::Limited(cache) => cache.put(key, value),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            Self::Unbounded(cache) => cache.contains(key),
            Self::Limited(cache) => cache.contains(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Unbounded(cache) => cache.len(),
            Self::Limited(cache) => cache.len(),
        }
    }

    fn memory_used(&self) -> usize {
        match self {
            Self::Unbounded(cache) => cache.memory_used(),
            Self::Limited(cache) => cache.memory_used(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Unbounded(cache) => cache.clear(),
            Self::Limited(cache) => cache.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(16), Some(16))]
    #[case(Some(DEFAULT_CACHE_LIMIT), Some(DEFAULT_CACHE_LIMIT))]
    fn test_memory_cache_limit(
        #[case] limit: Option<usize>,
        #[case] expected: Option<usize>,
    ) {
        let cache: MemoryCache<u64, Vec<u8>> =
            MemoryCache::new("test".to_string(), limit)
                .expect("Failed to create cache");
        assert_eq!(cache.limit(), expected);
    }

    #[test]
    fn test_memory_cache_rejects_zero_limit() {
        let cache: Result<MemoryCache<u64, Vec<u8>>> =
            MemoryCache::new("test".to_string(), Some(0));
        assert!(cache.is_err());
    }

    #[test]
    fn test_unbounded_retains_everything() {
        let mut cache: MemoryCache<u64, Vec<u8>> =
            MemoryCache::new("test".to_string(), None).unwrap();
        for i in 0..100 {
            cache.put(i, vec![0; 4096]);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.memory_used(), 100 * 4096);
        assert!((0..100).all(|i| cache.contains(&i)));
    }

    fn fill<C: ChunkCache<u64, Vec<u8>>>(mut cache: C) {
        cache.put(1, vec![1, 2, 3]);
    }

    #[test]
    fn test_borrowed_and_boxed_caches() {
        let mut owned: MemoryCache<u64, Vec<u8>> =
            MemoryCache::new("test".to_string(), Some(8)).unwrap();
        fill(&mut owned);
        assert_eq!(owned.get(&1), Some(vec![1, 2, 3]));

        let mut boxed: Box<dyn ChunkCache<u64, Vec<u8>>> =
            Box::new(UnboundedCache::new("boxed".to_string()));
        boxed.put(7, vec![7]);
        assert_eq!(boxed.get(&7), Some(vec![7]));
        assert_eq!(boxed.memory_used(), 1);
    }
}
