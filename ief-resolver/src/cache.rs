//! Memoized resolution results keyed by document fingerprint.
//!
//! Resolution is a pure function of the document text, so a result can be
//! reused for as long as the same three documents are supplied. Entries are
//! shared behind `Arc` and the map is safe to use from concurrent passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::CacheConfig;
use crate::types::ResolutionResult;

/// A cached pass. `None` records that the default journey could not be resolved.
#[derive(Debug, Clone)]
struct CachedResolution {
    result: Option<Arc<ResolutionResult>>,
    /// Insertion sequence, lowest is evicted first
    seq: u64,
}

/// Bounded fingerprint-keyed cache of resolution passes.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: DashMap<String, CachedResolution>,
    max_entries: usize,
    next_seq: AtomicU64,
}

impl ResolutionCache {
    /// Create a cache holding at most `max_entries` passes.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(max_entries),
            max_entries,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries)
    }

    /// Cached outcome for `fingerprint`. The outer `None` is a miss.
    pub fn get(&self, fingerprint: &str) -> Option<Option<Arc<ResolutionResult>>> {
        self.entries.get(fingerprint).map(|entry| entry.result.clone())
    }

    /// Store the outcome of a pass, evicting the oldest entry when full.
    pub fn insert(&self, fingerprint: String, result: Option<Arc<ResolutionResult>>) {
        if self.max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(&fingerprint) {
            while self.entries.len() >= self.max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries
            .insert(fingerprint, CachedResolution { result, seq });
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => {
                tracing::debug!(fingerprint = %key, "Evicting cached resolution");
                self.entries.remove(&key).is_some()
            }
            None => false,
        }
    }

    /// Drop a single entry. Returns whether it was present.
    pub fn invalidate(&self, fingerprint: &str) -> bool {
        self.entries.remove(fingerprint).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
