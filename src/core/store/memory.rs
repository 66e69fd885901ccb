//! In-memory repository
//!
//! Implements both collaborator traits over a `HashMap` guarded by a
//! `parking_lot::RwLock`. Used by tests and benches, and by callers that keep
//! the containment tree in process. Not durable.

use super::{AncestorPathProvider, RawAclFacts, RepositoryObjectAccessor};
use crate::core::model::{ObjectType, Pid, Role};
use crate::error::{AccessError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct StoredObject {
    facts: RawAclFacts,
    parent: Option<Pid>,
}

/// Repository held entirely in memory
#[derive(Debug)]
pub struct MemoryRepository {
    objects: RwLock<HashMap<Pid, StoredObject>>,
    fetches: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryRepository {
    /// Create a repository containing only the content root
    pub fn new() -> Self {
        let mut objects = HashMap::new();
        objects.insert(
            Pid::content_root(),
            StoredObject {
                facts: RawAclFacts::empty(ObjectType::ContentRoot),
                parent: None,
            },
        );

        MemoryRepository {
            objects: RwLock::new(objects),
            fetches: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Add an object under `parent`. `None` leaves it detached from the tree.
    pub fn add_object(&self, pid: impl Into<Pid>, object_type: ObjectType, parent: Option<&Pid>) -> Pid {
        let pid = pid.into();
        self.objects.write().insert(
            pid.clone(),
            StoredObject {
                facts: RawAclFacts::empty(object_type),
                parent: parent.cloned(),
            },
        );
        pid
    }

    /// Append a `(principal, role)` fact to an object
    pub fn assign(&self, pid: &Pid, principal: &str, role: Role) {
        self.assign_raw(pid, principal, role.id());
    }

    /// Append a fact with an arbitrary role string, as legacy data may hold
    pub fn assign_raw(&self, pid: &Pid, principal: &str, role: &str) {
        self.update(pid, |facts| {
            facts
                .assignments
                .push((principal.to_string(), role.to_string()))
        });
    }

    /// Remove every role assignment for `principal` on an object
    pub fn revoke(&self, pid: &Pid, principal: &str) {
        self.update(pid, |facts| facts.assignments.retain(|(p, _)| p != principal));
    }

    pub fn set_embargo(&self, pid: &Pid, raw: Option<&str>) {
        self.update(pid, |facts| facts.embargo_until = raw.map(str::to_string));
    }

    pub fn mark_for_deletion(&self, pid: &Pid, marked: bool) {
        self.update(pid, |facts| facts.marked_for_deletion = marked);
    }

    pub fn set_tombstone(&self, pid: &Pid, tombstone: bool) {
        self.update(pid, |facts| facts.tombstone = tombstone);
    }

    /// Replace all facts for an object
    pub fn set_facts(&self, pid: &Pid, facts: RawAclFacts) {
        self.update(pid, |stored| *stored = facts);
    }

    /// Simulate the backing store going away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `fetch_acl_facts` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn update(&self, pid: &Pid, f: impl FnOnce(&mut RawAclFacts)) {
        if let Some(stored) = self.objects.write().get_mut(pid) {
            f(&mut stored.facts);
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AccessError::BackingStore(
                "memory repository is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryObjectAccessor for MemoryRepository {
    fn fetch_acl_facts(&self, pid: &Pid) -> Result<RawAclFacts> {
        self.check_available()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        self.objects
            .read()
            .get(pid)
            .map(|stored| stored.facts.clone())
            .ok_or_else(|| AccessError::ObjectNotFound(pid.clone()))
    }
}

impl AncestorPathProvider for MemoryRepository {
    fn ancestor_pids(&self, pid: &Pid) -> Result<Vec<Pid>> {
        self.check_available()?;

        let objects = self.objects.read();
        let mut current = objects
            .get(pid)
            .ok_or_else(|| AccessError::ObjectNotFound(pid.clone()))?;

        let mut ancestors = Vec::new();
        while let Some(parent) = &current.parent {
            if ancestors.len() > objects.len() {
                return Err(AccessError::BackingStore(format!(
                    "containment cycle above {}",
                    pid
                )));
            }
            ancestors.push(parent.clone());
            current = objects
                .get(parent)
                .ok_or_else(|| AccessError::ObjectNotFound(parent.clone()))?;
        }

        ancestors.reverse();
        Ok(ancestors)
    }
}
