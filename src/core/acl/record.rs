//! Typed form of one object's direct ACL facts

use crate::core::model::{ObjectType, Pid, PrincipalClassifier, Role};
use crate::core::store::RawAclFacts;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Direct (non-inherited) ACL facts for one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectAclRecord {
    pub object_type: ObjectType,
    /// At most one role per principal
    pub principal_roles: BTreeMap<String, Role>,
    pub embargo_until: Option<DateTime<Utc>>,
    pub marked_for_deletion: bool,
}

impl DirectAclRecord {
    /// Record with no ACL properties
    pub fn empty(object_type: ObjectType) -> Self {
        DirectAclRecord {
            object_type,
            principal_roles: BTreeMap::new(),
            embargo_until: None,
            marked_for_deletion: false,
        }
    }

    /// Parse raw store facts
    ///
    /// Never fails. A field that cannot be understood is treated as absent:
    /// unknown role ids are skipped and an unreadable embargo means no
    /// embargo. Duplicate principals keep the last role seen.
    pub fn parse(pid: &Pid, raw: RawAclFacts) -> Self {
        let mut principal_roles = BTreeMap::new();
        for (principal, role_id) in raw.assignments {
            match role_id.parse::<Role>() {
                Ok(role) => {
                    if let Some(previous) = principal_roles.insert(principal.clone(), role) {
                        debug!(
                            "Object {} assigns {} twice ({} then {}), keeping the last",
                            pid, principal, previous, role
                        );
                    }
                }
                Err(_) => warn!(
                    "Ignoring unknown role '{}' for {} on {}",
                    role_id, principal, pid
                ),
            }
        }

        let embargo_until = raw.embargo_until.as_deref().and_then(|value| {
            let parsed = parse_embargo(value);
            if parsed.is_none() {
                warn!("Ignoring unparseable embargo '{}' on {}", value, pid);
            }
            parsed
        });

        DirectAclRecord {
            object_type: raw.object_type,
            principal_roles,
            embargo_until,
            marked_for_deletion: raw.marked_for_deletion || raw.tombstone,
        }
    }

    /// Staff roles held by staff principals
    pub fn staff_roles(&self, classifier: &PrincipalClassifier) -> BTreeMap<String, Role> {
        self.principal_roles
            .iter()
            .filter(|(principal, role)| {
                role.is_staff() && category_matches(classifier.is_staff(principal), principal, role)
            })
            .map(|(principal, role)| (principal.clone(), *role))
            .collect()
    }

    /// Patron roles (including `none`) held by patron principals
    ///
    /// Empty for object types that do not take part in patron inheritance.
    pub fn patron_roles(&self, classifier: &PrincipalClassifier) -> BTreeMap<String, Role> {
        if !self.object_type.accepts_patron_roles() {
            return BTreeMap::new();
        }

        self.principal_roles
            .iter()
            .filter(|(principal, role)| {
                role.is_patron()
                    && category_matches(classifier.is_patron(principal), principal, role)
            })
            .map(|(principal, role)| (principal.clone(), *role))
            .collect()
    }
}

fn category_matches(matches: bool, principal: &str, role: &Role) -> bool {
    if !matches {
        debug!(
            "Dropping {} for {}: principal kind does not match role category",
            role, principal
        );
    }
    matches
}

/// Parse an embargo timestamp
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_embargo(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
