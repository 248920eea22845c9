use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Bounded text → embedding map. Keys are text hashes, so long chunks cost
/// eight bytes each.
pub struct EmbeddingCache {
    entries: LruCache<u64, Vec<f32>>,
    stats: CacheStats,
}

impl EmbeddingCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            stats: CacheStats::default(),
        }
    }

    fn key(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Cached vectors for `texts`, in order. `None` marks a miss.
    pub fn lookup(&mut self, texts: &[&str]) -> Vec<Option<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                let found = self.entries.get(&Self::key(text)).cloned();
                match found {
                    Some(_) => self.stats.hits += 1,
                    None => self.stats.misses += 1,
                }
                found
            })
            .collect()
    }

    pub fn insert(&mut self, text: &str, embedding: Vec<f32>) {
        self.entries.put(Self::key(text), embedding);
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
