//! Cached access to one object's direct ACL facts

use super::{AclCache, DirectAclRecord};
use crate::core::config::CacheConfig;
use crate::core::model::Pid;
use crate::core::store::RepositoryObjectAccessor;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Reads direct ACL records from the repository through an LRU/TTL cache
///
/// Cache-aside: the lock is released while the backing store is read, so two
/// callers missing on the same object may both fetch it. A fetch that overlaps
/// an invalidation is returned to its caller but not cached.
pub struct ObjectAclAccessor {
    store: Arc<dyn RepositoryObjectAccessor>,
    cache: Mutex<AclCache>,
}

impl ObjectAclAccessor {
    pub fn new(store: Arc<dyn RepositoryObjectAccessor>, config: &CacheConfig) -> Self {
        ObjectAclAccessor {
            store,
            cache: Mutex::new(AclCache::new(config.max_entries, config.ttl())),
        }
    }

    /// Direct ACL record for `pid`
    ///
    /// Performs at most one backing-store read, and none on a cache hit.
    pub fn get_direct(&self, pid: &Pid) -> Result<Arc<DirectAclRecord>> {
        let generation = {
            let mut cache = self.cache.lock();
            if let Some(record) = cache.get(pid, Instant::now()) {
                return Ok(record);
            }
            cache.generation()
        };

        debug!("ACL cache miss for {}", pid);
        let raw = self.store.fetch_acl_facts(pid)?;
        let record = Arc::new(DirectAclRecord::parse(pid, raw));

        let cached = self.cache.lock().put_if_current(
            pid.clone(),
            Arc::clone(&record),
            generation,
            Instant::now(),
        );
        if !cached {
            debug!("Not caching {}: invalidated during fetch", pid);
        }
        Ok(record)
    }

    /// Force the next read of `pid` to go to the store
    pub fn invalidate(&self, pid: &Pid) {
        debug!("Invalidating cached ACL for {}", pid);
        self.cache.lock().invalidate(pid);
    }

    pub fn invalidate_all(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}
