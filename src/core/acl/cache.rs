//! LRU cache for direct ACL records
//!
//! Entries are bounded by count and expire after a fixed time-to-live. An
//! expired entry is removed when it is next looked up.
//!
//! Every invalidation bumps a generation counter. A record fetched while the
//! lock was released is only stored if no invalidation ran in the meantime.

use super::DirectAclRecord;
use crate::core::model::Pid;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedRecord {
    record: Arc<DirectAclRecord>,
    loaded_at: Instant,
}

/// LRU cache of direct ACL records keyed by object id
pub struct AclCache {
    cache: LruCache<Pid, CachedRecord>,
    ttl: Duration,
    generation: u64,
}

impl AclCache {
    /// Create a cache with given capacity and time-to-live
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        AclCache {
            cache: LruCache::new(capacity),
            ttl,
            generation: 0,
        }
    }

    /// Get a live record, evicting it if it has expired
    pub fn get(&mut self, pid: &Pid, now: Instant) -> Option<Arc<DirectAclRecord>> {
        let expired = match self.cache.get(pid) {
            Some(entry) if now.saturating_duration_since(entry.loaded_at) < self.ttl => {
                return Some(Arc::clone(&entry.record));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.cache.pop(pid);
        }
        None
    }

    pub fn put(&mut self, pid: Pid, record: Arc<DirectAclRecord>, now: Instant) {
        self.cache.put(
            pid,
            CachedRecord {
                record,
                loaded_at: now,
            },
        );
    }

    /// Store `record` only if nothing was invalidated since `generation` was read
    ///
    /// Returns whether the record was cached.
    pub fn put_if_current(
        &mut self,
        pid: Pid,
        record: Arc<DirectAclRecord>,
        generation: u64,
        now: Instant,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.put(pid, record, now);
        true
    }

    /// Current invalidation generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop one entry
    pub fn invalidate(&mut self, pid: &Pid) {
        self.generation = self.generation.wrapping_add(1);
        self.cache.pop(pid);
    }

    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
