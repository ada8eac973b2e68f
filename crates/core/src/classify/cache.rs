//! Memoization of classification results.
//!
//! Caching is purely an optimization: a hit must reproduce byte-identical
//! output to a miss for the same key. Entries expire after a fixed window
//! and the map is capacity-bounded with oldest-first eviction.

use canopy_api::models::{ClassificationResult, Language};
use dashmap::DashMap;
use smol_str::SmolStr;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 5_000,
            ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub language: Language,
    pub raw_type: SmolStr,
    /// Parent raw type, or `"none"` at the root.
    pub parent_type: SmolStr,
    pub sibling_count: usize,
    /// Node name plus a fingerprint of properties, immediate child types,
    /// and the bounded ancestor chain: context rules may consult all of
    /// these, so hits must not cross nodes that differ in them.
    pub name: Option<SmolStr>,
    pub props_fingerprint: u64,
}

struct CacheEntry {
    result: ClassificationResult,
    inserted: Instant,
}

pub struct ClassificationCache {
    entries: DashMap<CacheKey, CacheEntry>,
    /// Insertion order for oldest-first eviction. May contain keys already
    /// dropped by expiry; eviction skips those harmlessly.
    order: Mutex<VecDeque<CacheKey>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClassificationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<ClassificationResult> {
        if !self.config.enabled {
            return None;
        }
        if let Some(entry) = self.entries.get(key) {
            if entry.inserted.elapsed() <= self.config.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.result.clone());
            }
        }
        // Expired entries are dropped on access.
        self.entries
            .remove_if(key, |_, entry| entry.inserted.elapsed() > self.config.ttl);
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: CacheKey, result: ClassificationResult) {
        if !self.config.enabled {
            return;
        }
        if self.entries.contains_key(&key) {
            self.entries.insert(
                key,
                CacheEntry {
                    result,
                    inserted: Instant::now(),
                },
            );
            return;
        }
        let mut order = self.order.lock().expect("cache order lock poisoned");
        while self.entries.len() >= self.config.capacity {
            match order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        order.push_back(key.clone());
        drop(order);
        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.order.lock().expect("cache order lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn reset_counters(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
