//! Object permission evaluation
//!
//! Staff roles are checked first and are unaffected by deletion or embargo.
//! Patron access only applies to objects that are not marked for deletion,
//! and is capped while an embargo is in force.

use super::InheritedAclResolver;
use crate::core::model::{Permission, Pid, PrincipalSet, Role};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Answers yes/no permission questions for one object
#[derive(Clone)]
pub struct PermissionEvaluator {
    resolver: Arc<InheritedAclResolver>,
}

impl PermissionEvaluator {
    pub fn new(resolver: Arc<InheritedAclResolver>) -> Self {
        PermissionEvaluator { resolver }
    }

    pub fn resolver(&self) -> &InheritedAclResolver {
        &self.resolver
    }

    /// Whether any of `principals` holds `permission` on `pid`
    ///
    /// # Errors
    ///
    /// `OrphanedObject` when the object has no ancestors, and whatever the
    /// backing store raises. A plain denial is `Ok(false)`.
    pub fn has_permission(
        &self,
        pid: &Pid,
        principals: &PrincipalSet,
        permission: Permission,
    ) -> Result<bool> {
        self.has_permission_at(pid, principals, permission, Utc::now())
    }

    /// Like [`has_permission`](Self::has_permission) with embargoes judged at `now`
    pub fn has_permission_at(
        &self,
        pid: &Pid,
        principals: &PrincipalSet,
        permission: Permission,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if pid.is_content_root() {
            return Ok(false);
        }

        let chain = self.resolver.load_chain(pid)?;

        let staff_roles = chain.staff_roles();
        let staff_grant = principals
            .iter()
            .filter_map(|principal| staff_roles.get(principal))
            .flatten()
            .any(|role| role.grants(permission));
        if staff_grant {
            debug!("{} granted on {} by staff role", permission, pid);
            return Ok(true);
        }

        if chain.is_marked_for_deletion() {
            debug!("{} denied on {}: marked for deletion", permission, pid);
            return Ok(false);
        }

        let patron_access = chain.patron_access_at(now);
        let granted = principals
            .iter()
            .filter_map(|principal| patron_access.get(principal))
            .any(|role: &Role| role.grants(permission));

        debug!(
            "{} {} on {} by patron access",
            permission,
            if granted { "granted" } else { "denied" },
            pid
        );
        Ok(granted)
    }
}
