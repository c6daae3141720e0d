//! Bounded, time-expiring cache of full analysis results.
//!
//! Keys are SHA-256 fingerprints of the resolved request, so two requests
//! with the same effective text, language and summary length always collide
//! no matter how they were built.

use super::types::{FullAnalysisResult, ResolvedRequest};
use crate::config::CacheConfig;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry {
    value: FullAnalysisResult,
    inserted_at: Instant,
}

/// Process-wide LRU result cache with a TTL.
///
/// One mutex guards the LRU bookkeeping; it is held only for the map
/// operation itself, never across an await point.
pub struct ResultCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    /// Create a cache holding at most `max_items` entries for `ttl` each.
    ///
    /// A zero capacity is clamped to one entry.
    pub fn new(max_items: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_items).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_items, config.ttl())
    }

    /// Canonical content hash of a resolved request.
    ///
    /// Fields are written in a fixed order with NUL separators; the text goes
    /// last so the encoding stays unambiguous.
    pub fn fingerprint(request: &ResolvedRequest) -> String {
        let mut hasher = Sha256::new();
        hasher.update(request.language.code().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.summary_length.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(request.text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a result. Expired entries read as absent and are dropped.
    pub fn get(&self, request: &ResolvedRequest) -> Option<FullAnalysisResult> {
        let key = Self::fingerprint(request);
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
            cache.pop(&key);
            tracing::debug!(key = %key, "Evicted expired cache entry");
        }
        None
    }

    /// Store a result, evicting the least-recently-used entry when full.
    pub fn set(&self, request: &ResolvedRequest, value: FullAnalysisResult) {
        let key = Self::fingerprint(request);
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, including not-yet-collected expired ones.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
