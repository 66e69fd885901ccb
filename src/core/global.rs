//! Global permission authority
//!
//! Grants staff roles to principals across the whole repository, independent
//! of any object's ACL. Built once from flat configuration properties of the
//! form
//!
//! ```text
//! acl.globalRoles.<roleId> = principal[,principal...]
//! ```
//!
//! and read-only afterwards. Callers usually consult it before object-level
//! evaluation and stop on a grant.

use crate::core::model::{Permission, PrincipalClassifier, PrincipalSet, Role};
use crate::error::{AccessError, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Property key prefix for global role grants
pub const GLOBAL_ROLES_PREFIX: &str = "acl.globalRoles.";

const GLOBAL_ROLE_KEY_PATTERN: &str = r"^acl\.globalRoles\.([A-Za-z]+)$";

/// Immutable principal -> global staff role mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalPermissionAuthority {
    principal_roles: BTreeMap<String, Role>,
}

impl GlobalPermissionAuthority {
    /// Build the authority from configuration properties
    ///
    /// Keys outside [`GLOBAL_ROLES_PREFIX`] are ignored.
    ///
    /// # Errors
    ///
    /// `InvalidAssignment` naming every problem found: unknown or patron role
    /// names, patron principals, and principals listed under more than one role.
    pub fn from_properties<'a, I>(properties: I, classifier: &PrincipalClassifier) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let key_pattern = Regex::new(GLOBAL_ROLE_KEY_PATTERN)
            .map_err(|e| AccessError::Config(e.to_string()))?;

        let mut principal_roles: BTreeMap<String, Role> = BTreeMap::new();
        let mut problems = Vec::new();

        for (key, value) in properties {
            if !key.starts_with(GLOBAL_ROLES_PREFIX) {
                continue;
            }

            let role = match key_pattern
                .captures(key)
                .and_then(|caps| caps.get(1))
                .and_then(|name| name.as_str().parse::<Role>().ok())
            {
                Some(role) if role.is_staff() => role,
                Some(role) => {
                    problems.push(format!(
                        "global role {} is a patron role, only staff roles may be granted globally",
                        role
                    ));
                    continue;
                }
                None => {
                    problems.push(format!("unrecognized global role key {}", key));
                    continue;
                }
            };

            for principal in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                if classifier.is_patron(principal) {
                    problems.push(format!(
                        "patron principal {} cannot be granted global role {}",
                        principal, role
                    ));
                    continue;
                }

                match principal_roles.get(principal) {
                    Some(existing) if *existing != role => problems.push(format!(
                        "principal {} is assigned multiple global roles: {}, {}",
                        principal, existing, role
                    )),
                    Some(_) => {}
                    None => {
                        principal_roles.insert(principal.to_string(), role);
                    }
                }
            }
        }

        if !problems.is_empty() {
            return Err(AccessError::InvalidAssignment(format!(
                "Invalid global role configuration: {}",
                problems.join("; ")
            )));
        }

        info!(
            "Loaded global roles for {} principals",
            principal_roles.len()
        );
        Ok(GlobalPermissionAuthority { principal_roles })
    }

    /// Whether any caller principal holds a global role granting `permission`
    pub fn has_global_permission(&self, principals: &PrincipalSet, permission: Permission) -> bool {
        let granted = self
            .roles_for(principals)
            .any(|role| role.grants(permission));
        if granted {
            debug!("{} granted by global role", permission);
        }
        granted
    }

    /// Whether any caller principal holds a global role at all
    pub fn has_global_principal(&self, principals: &PrincipalSet) -> bool {
        self.roles_for(principals).next().is_some()
    }

    /// Global roles held by the caller's principals
    pub fn get_global_user_roles(&self, principals: &PrincipalSet) -> BTreeSet<Role> {
        self.roles_for(principals).collect()
    }

    pub fn global_role_of(&self, principal: &str) -> Option<Role> {
        self.principal_roles.get(principal).copied()
    }

    pub fn len(&self) -> usize {
        self.principal_roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principal_roles.is_empty()
    }

    fn roles_for<'s>(&'s self, principals: &'s PrincipalSet) -> impl Iterator<Item = Role> + 's {
        principals
            .iter()
            .filter_map(move |principal| self.principal_roles.get(principal).copied())
    }
}
