//! Immutable snapshot of the direct ACL records along one ancestor chain
//!
//! Every inherited answer for an object is computed from one of these, so a
//! single permission check reads each ancestor at most once and never sees a
//! mix of old and new state from different lookups.

use super::patron::{restate_patron_roles, PatronRoles};
use super::DirectAclRecord;
use crate::core::model::{Pid, PrincipalClassifier, Role, RoleAssignment};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One object in the chain with its direct record
#[derive(Debug, Clone)]
pub struct ChainNode {
    pub pid: Pid,
    pub record: Arc<DirectAclRecord>,
}

/// Effective patron roles plus the object whose statement produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatronResolution {
    pub roles: PatronRoles,
    /// Nearest object with a non-empty local patron statement
    pub stated_by: Option<Pid>,
}

/// Direct records for `ancestors + [target]`, root first
///
/// The content root is never part of the chain.
#[derive(Debug, Clone)]
pub struct AclChain<'a> {
    target: Pid,
    nodes: Vec<ChainNode>,
    classifier: &'a PrincipalClassifier,
}

impl<'a> AclChain<'a> {
    pub fn new(target: Pid, nodes: Vec<ChainNode>, classifier: &'a PrincipalClassifier) -> Self {
        AclChain {
            target,
            nodes,
            classifier,
        }
    }

    pub fn target(&self) -> &Pid {
        &self.target
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    /// Union of staff roles from every node; nothing is ever overridden
    pub fn staff_roles(&self) -> BTreeMap<String, BTreeSet<Role>> {
        let mut merged: BTreeMap<String, BTreeSet<Role>> = BTreeMap::new();
        for node in &self.nodes {
            for (principal, role) in node.record.staff_roles(self.classifier) {
                merged.entry(principal).or_default().insert(role);
            }
        }
        merged
    }

    /// Every staff assignment in the chain with the object carrying it
    pub fn staff_role_assignments(&self) -> Vec<RoleAssignment> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.record
                    .staff_roles(self.classifier)
                    .into_iter()
                    .map(move |(principal, role)| {
                        RoleAssignment::new(principal, role, node.pid.clone())
                    })
            })
            .collect()
    }

    /// Patron roles after ratcheting down the chain, before embargo or deletion
    pub fn patron_resolution(&self) -> PatronResolution {
        let mut resolution = PatronResolution::default();

        for node in &self.nodes {
            let local = node.record.patron_roles(self.classifier);
            if local.is_empty() {
                continue;
            }

            let inherited = resolution.stated_by.as_ref().map(|_| &resolution.roles);
            resolution.roles = restate_patron_roles(&local, inherited);
            resolution.stated_by = Some(node.pid.clone());
        }

        resolution
    }

    pub fn patron_roles(&self) -> PatronRoles {
        self.patron_resolution().roles
    }

    /// Effective patron roles as `RoleAssignment`s
    pub fn patron_role_assignments(&self) -> Vec<RoleAssignment> {
        let resolution = self.patron_resolution();
        match resolution.stated_by {
            Some(stated_by) => resolution
                .roles
                .into_iter()
                .map(|(principal, role)| RoleAssignment::new(principal, role, stated_by.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Embargo from the nearest node that defines one, target first
    pub fn embargo_until(&self) -> Option<DateTime<Utc>> {
        self.nodes
            .iter()
            .rev()
            .find_map(|node| node.record.embargo_until)
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.nodes.iter().any(|node| node.record.marked_for_deletion)
    }

    /// Patron access after deletion and embargo gating
    pub fn patron_access_at(&self, now: DateTime<Utc>) -> PatronRoles {
        if self.is_marked_for_deletion() {
            return PatronRoles::new();
        }

        let mut roles = self.patron_roles();
        if let Some(embargo) = self.embargo_until() {
            if embargo > now {
                apply_embargo(&mut roles);
            }
        }
        roles
    }

    /// Staff and undecayed patron roles together, per principal
    pub fn principal_roles(&self) -> BTreeMap<String, BTreeSet<Role>> {
        let mut combined = self.staff_roles();
        for (principal, role) in self.patron_roles() {
            combined.entry(principal).or_default().insert(role);
        }
        combined
    }
}

fn apply_embargo(roles: &mut PatronRoles) {
    let floor = Role::LOWEST_VISIBLE_PATRON;
    for role in roles.values_mut() {
        if role.rank() > floor.rank() {
            *role = floor;
        }
    }
}
