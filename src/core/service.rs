//! Access control entry point
//!
//! Wires the global authority, the cached accessor, the resolver and the
//! evaluator together. Global grants are consulted first; object ACLs are
//! only resolved when no global role applies.

use crate::core::acl::{InheritedAclResolver, ObjectAclAccessor, PermissionEvaluator};
use crate::core::config::AccessConfig;
use crate::core::global::GlobalPermissionAuthority;
use crate::core::model::{Permission, Pid, PrincipalSet};
use crate::core::store::{AncestorPathProvider, RepositoryObjectAccessor};
use crate::core::validation::AclValidator;
use crate::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Combined global and object-level access checks
#[derive(Clone)]
pub struct AccessControlService {
    global: Arc<GlobalPermissionAuthority>,
    evaluator: PermissionEvaluator,
    validator: AclValidator,
}

impl AccessControlService {
    pub fn new(global: Arc<GlobalPermissionAuthority>, evaluator: PermissionEvaluator) -> Self {
        let validator = AclValidator::new(evaluator.resolver().classifier().clone());
        AccessControlService {
            global,
            evaluator,
            validator,
        }
    }

    /// Build the full stack over a store that answers both fact and ancestry lookups
    ///
    /// # Errors
    ///
    /// `InvalidAssignment` when the configured global roles are invalid.
    pub fn from_config<S>(config: &AccessConfig, store: Arc<S>) -> Result<Self>
    where
        S: RepositoryObjectAccessor + AncestorPathProvider + 'static,
    {
        let classifier = config.classifier();
        let global =
            GlobalPermissionAuthority::from_properties(&config.flat_properties(), &classifier)?;

        let accessor = Arc::new(ObjectAclAccessor::new(store.clone(), &config.cache));
        let resolver = Arc::new(InheritedAclResolver::new(accessor, store, classifier));

        info!(
            "Access control ready: {} global principals, cache capacity {}",
            global.len(),
            config.cache.max_entries
        );
        Ok(Self::new(Arc::new(global), PermissionEvaluator::new(resolver)))
    }

    pub fn global(&self) -> &GlobalPermissionAuthority {
        &self.global
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    pub fn resolver(&self) -> &InheritedAclResolver {
        self.evaluator.resolver()
    }

    pub fn validator(&self) -> &AclValidator {
        &self.validator
    }

    /// Whether the caller holds `permission` on `pid`, globally or through the object's ACLs
    pub fn has_access(
        &self,
        pid: &Pid,
        principals: &PrincipalSet,
        permission: Permission,
    ) -> Result<bool> {
        self.has_access_at(pid, principals, permission, Utc::now())
    }

    pub fn has_access_at(
        &self,
        pid: &Pid,
        principals: &PrincipalSet,
        permission: Permission,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if self.global.has_global_permission(principals, permission) {
            return Ok(true);
        }
        self.evaluator
            .has_permission_at(pid, principals, permission, now)
    }

    /// Like [`has_access`](Self::has_access), failing with `AccessDenied` instead of `false`
    pub fn assert_has_access(
        &self,
        pid: &Pid,
        principals: &PrincipalSet,
        permission: Permission,
    ) -> Result<()> {
        if self.has_access(pid, principals, permission)? {
            Ok(())
        } else {
            debug!("Access denied: {} on {}", permission, pid);
            Err(AccessError::AccessDenied {
                pid: pid.clone(),
                permission,
            })
        }
    }
}
