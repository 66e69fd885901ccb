//! Inherited ACL resolution
//!
//! Walks an object's ancestor chain and merges each node's direct facts:
//! - Staff roles are additive; a grant anywhere above stays in force.
//! - Patron roles ratchet down; see [`restate_patron_roles`](super::restate_patron_roles).
//! - The nearest embargo wins; deletion anywhere above marks the object deleted.

use super::{AclChain, ChainNode, ObjectAclAccessor, PatronRoles};
use crate::core::model::{Pid, PrincipalClassifier, Role, RoleAssignment};
use crate::core::store::AncestorPathProvider;
use crate::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::warn;

/// Computes effective roles and status for objects from their ancestry
pub struct InheritedAclResolver {
    accessor: Arc<ObjectAclAccessor>,
    ancestors: Arc<dyn AncestorPathProvider>,
    classifier: PrincipalClassifier,
}

impl InheritedAclResolver {
    pub fn new(
        accessor: Arc<ObjectAclAccessor>,
        ancestors: Arc<dyn AncestorPathProvider>,
        classifier: PrincipalClassifier,
    ) -> Self {
        InheritedAclResolver {
            accessor,
            ancestors,
            classifier,
        }
    }

    pub fn accessor(&self) -> &ObjectAclAccessor {
        &self.accessor
    }

    pub fn classifier(&self) -> &PrincipalClassifier {
        &self.classifier
    }

    /// Snapshot the direct records for `pid` and its ancestors
    ///
    /// The content root yields an empty chain. Any other object whose
    /// ancestor lookup comes back empty is reported as orphaned.
    pub fn load_chain(&self, pid: &Pid) -> Result<AclChain<'_>> {
        if pid.is_content_root() {
            return Ok(AclChain::new(pid.clone(), Vec::new(), &self.classifier));
        }

        let ancestors = self.ancestors.ancestor_pids(pid)?;
        if ancestors.is_empty() {
            warn!("Object {} has no ancestors", pid);
            return Err(AccessError::OrphanedObject(pid.clone()));
        }

        let mut nodes = Vec::with_capacity(ancestors.len() + 1);
        for ancestor in ancestors.iter().filter(|a| !a.is_content_root()) {
            nodes.push(ChainNode {
                pid: ancestor.clone(),
                record: self.accessor.get_direct(ancestor)?,
            });
        }
        nodes.push(ChainNode {
            pid: pid.clone(),
            record: self.accessor.get_direct(pid)?,
        });

        Ok(AclChain::new(pid.clone(), nodes, &self.classifier))
    }

    /// Staff roles per principal, unioned over the whole chain
    pub fn resolve_staff_roles(&self, pid: &Pid) -> Result<BTreeMap<String, BTreeSet<Role>>> {
        Ok(self.load_chain(pid)?.staff_roles())
    }

    /// Patron roles after ratcheting, before embargo and deletion gating
    pub fn resolve_patron_roles(&self, pid: &Pid) -> Result<PatronRoles> {
        Ok(self.load_chain(pid)?.patron_roles())
    }

    /// Staff and patron roles together, for display and indexing
    pub fn get_principal_roles(&self, pid: &Pid) -> Result<BTreeMap<String, BTreeSet<Role>>> {
        Ok(self.load_chain(pid)?.principal_roles())
    }

    /// Effective patron access as of now
    pub fn get_patron_access(&self, pid: &Pid) -> Result<PatronRoles> {
        self.get_patron_access_at(pid, Utc::now())
    }

    /// Effective patron access as of `now`
    pub fn get_patron_access_at(&self, pid: &Pid, now: DateTime<Utc>) -> Result<PatronRoles> {
        Ok(self.load_chain(pid)?.patron_access_at(now))
    }

    pub fn get_staff_role_assignments(&self, pid: &Pid) -> Result<Vec<RoleAssignment>> {
        Ok(self.load_chain(pid)?.staff_role_assignments())
    }

    pub fn get_patron_role_assignments(&self, pid: &Pid) -> Result<Vec<RoleAssignment>> {
        Ok(self.load_chain(pid)?.patron_role_assignments())
    }

    pub fn is_marked_for_deletion(&self, pid: &Pid) -> Result<bool> {
        Ok(self.load_chain(pid)?.is_marked_for_deletion())
    }

    pub fn get_embargo_until(&self, pid: &Pid) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load_chain(pid)?.embargo_until())
    }
}
