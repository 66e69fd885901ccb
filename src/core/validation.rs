//! Validation of direct ACL assignments before they are persisted
//!
//! Each object type accepts a fixed set of ACL properties:
//!
//! | Type | Legal properties |
//! |------|------------------|
//! | `AdminUnit` | staff roles up to `unitOwner` |
//! | `Collection` | patron roles, staff roles except `unitOwner`, embargo, deletion flag |
//! | `Folder`, `Work`, `FileObject` | patron roles, embargo, deletion flag |
//!
//! The content root and other types accept nothing. Role properties must name
//! a principal of the matching kind, never an empty principal, and a
//! principal may hold only one role per object.

use crate::core::acl::parse_embargo;
use crate::core::model::{ObjectType, PrincipalClassifier, Role};
use crate::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// An ACL property that may be set directly on an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AclProperty {
    Role(Role),
    EmbargoUntil,
    MarkedForDeletion,
}

impl fmt::Display for AclProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclProperty::Role(role) => write!(f, "{}", role),
            AclProperty::EmbargoUntil => f.write_str("embargoUntil"),
            AclProperty::MarkedForDeletion => f.write_str("markedForDeletion"),
        }
    }
}

/// One proposed `(property, value)` fact for an object
///
/// For role properties the value is the principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclStatement {
    pub property: AclProperty,
    pub value: String,
}

impl AclStatement {
    pub fn role(principal: impl Into<String>, role: Role) -> Self {
        AclStatement {
            property: AclProperty::Role(role),
            value: principal.into(),
        }
    }

    pub fn embargo(until: DateTime<Utc>) -> Self {
        AclStatement {
            property: AclProperty::EmbargoUntil,
            value: until.to_rfc3339(),
        }
    }

    pub fn marked_for_deletion(marked: bool) -> Self {
        AclStatement {
            property: AclProperty::MarkedForDeletion,
            value: marked.to_string(),
        }
    }
}

/// Checks proposed direct ACL assignments
#[derive(Debug, Clone, Default)]
pub struct AclValidator {
    classifier: PrincipalClassifier,
}

impl AclValidator {
    pub fn new(classifier: PrincipalClassifier) -> Self {
        AclValidator { classifier }
    }

    /// Validate the full set of direct assignments proposed for one object
    ///
    /// # Errors
    ///
    /// One `InvalidAssignment` describing every violation found.
    pub fn validate(&self, object_type: ObjectType, statements: &[AclStatement]) -> Result<()> {
        if !is_acl_bearing(object_type) {
            return Err(AccessError::InvalidAssignment(format!(
                "Object type {} is not applicable for access restrictions",
                object_type
            )));
        }

        let mut problems = Vec::new();

        let mut illegal: Vec<String> = Vec::new();
        for statement in statements {
            let name = statement.property.to_string();
            if !is_legal_property(object_type, statement.property) && !illegal.contains(&name) {
                illegal.push(name);
            }
        }
        if !illegal.is_empty() {
            problems.push(format!(
                "Invalid acl properties for {}: {}",
                object_type,
                illegal.join(", ")
            ));
        }

        let mut roles_by_principal: BTreeMap<&str, Vec<Role>> = BTreeMap::new();
        for statement in statements {
            match statement.property {
                AclProperty::Role(role) => {
                    if let Some(problem) = self.check_principal(role, &statement.value) {
                        problems.push(problem);
                        continue;
                    }
                    let held = roles_by_principal.entry(statement.value.as_str()).or_default();
                    if !held.contains(&role) {
                        held.push(role);
                    }
                }
                AclProperty::EmbargoUntil => {
                    if parse_embargo(&statement.value).is_none() {
                        problems.push(format!("Invalid embargo date '{}'", statement.value));
                    }
                }
                AclProperty::MarkedForDeletion => {
                    if statement.value.parse::<bool>().is_err() {
                        problems.push(format!(
                            "Invalid deletion flag '{}', expected true or false",
                            statement.value
                        ));
                    }
                }
            }
        }

        for (principal, roles) in roles_by_principal {
            if roles.len() > 1 {
                let names: Vec<String> = roles.iter().map(Role::to_string).collect();
                problems.push(format!(
                    "Principal {} is assigned multiple roles: {}",
                    principal,
                    names.join(", ")
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            let message = problems.join("; ");
            debug!("Rejected ACL update for {}: {}", object_type, message);
            Err(AccessError::InvalidAssignment(message))
        }
    }

    fn check_principal(&self, role: Role, principal: &str) -> Option<String> {
        if principal.is_empty() {
            return Some(format!("Cannot assign empty principal to role {}", role));
        }

        let patron_principal = self.classifier.is_patron(principal);
        if role.is_patron() && !patron_principal {
            Some(format!(
                "Invalid staff principal {} assigned to patron role {}",
                principal, role
            ))
        } else if role.is_staff() && patron_principal {
            Some(format!(
                "Invalid patron principal {} assigned to staff role {}",
                principal, role
            ))
        } else {
            None
        }
    }
}

fn is_acl_bearing(object_type: ObjectType) -> bool {
    !matches!(object_type, ObjectType::ContentRoot | ObjectType::Other)
}

fn is_legal_property(object_type: ObjectType, property: AclProperty) -> bool {
    match (object_type, property) {
        (ObjectType::AdminUnit, AclProperty::Role(role)) => {
            role.is_staff() && role != Role::Administrator
        }
        (ObjectType::AdminUnit, _) => false,
        (ObjectType::Collection, AclProperty::Role(role)) => {
            role.is_patron() || (role.is_staff() && role.rank() < Role::UnitOwner.rank())
        }
        (ObjectType::Folder | ObjectType::Work | ObjectType::FileObject, AclProperty::Role(role)) => {
            role.is_patron()
        }
        (
            ObjectType::Collection | ObjectType::Folder | ObjectType::Work | ObjectType::FileObject,
            AclProperty::EmbargoUntil | AclProperty::MarkedForDeletion,
        ) => true,
        (ObjectType::ContentRoot | ObjectType::Other, _) => false,
    }
}
