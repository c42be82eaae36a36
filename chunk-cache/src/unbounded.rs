use std::collections::HashMap;
use std::hash::Hash;

use crate::ChunkCache;

/// A cache without a memory budget: every value put is kept until
/// `clear` is called.
pub struct UnboundedCache<K, V> {
    /// Label for logging
    label: String,
    entries: HashMap<K, V>,
    memory_used: usize,
}

impl<K, V> UnboundedCache<K, V> {
    pub fn new(label: String) -> Self {
        log::debug!("cache/{}: initialized without bytes limit", label);
        Self {
            label,
            entries: HashMap::new(),
            memory_used: 0,
        }
    }
}

impl<K, V> ChunkCache<K, V> for UnboundedCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone + AsRef<[u8]>,
{
    fn get(&mut self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: K, value: V) {
        let size = value.as_ref().len();
        log::trace!(
            "cache/{}: caching {} bytes for key {:?}",
            self.label,
            size,
            key
        );
        if let Some(old) = self.entries.insert(key, value) {
            self.memory_used -= old.as_ref().len();
        }
        self.memory_used += size;
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn memory_used(&self) -> usize {
        self.memory_used
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.memory_used = 0;
    }
}
