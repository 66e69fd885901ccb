//! Error types for access-control operations

use crate::core::model::{Permission, Pid};
use thiserror::Error;

/// Access-control result type
pub type Result<T> = std::result::Result<T, AccessError>;

/// Access-control errors
#[derive(Error, Debug)]
pub enum AccessError {
    /// Ancestor lookup returned nothing for an object that is not the root
    #[error("Object {0} has no ancestors; the repository graph is broken")]
    OrphanedObject(Pid),

    /// The backing store has no object with this id
    #[error("Object does not exist: {0}")]
    ObjectNotFound(Pid),

    /// Proposed ACL assignments or global role configuration were rejected
    #[error("Invalid access assignment: {0}")]
    InvalidAssignment(String),

    /// Backing store read failed
    #[error("Backing store failure: {0}")]
    BackingStore(String),

    /// Raised by callers that need a hard failure instead of `false`
    #[error("Insufficient permissions: {permission} is not granted on {pid}")]
    AccessDenied { pid: Pid, permission: Permission },

    /// Configuration could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccessError {
    /// True for the deterministic validation failure kind
    pub fn is_invalid_assignment(&self) -> bool {
        matches!(self, AccessError::InvalidAssignment(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_variants() {
        let errors = vec![
            AccessError::OrphanedObject(Pid::new("orphan")),
            AccessError::ObjectNotFound(Pid::new("missing")),
            AccessError::InvalidAssignment("bad".to_string()),
            AccessError::BackingStore("timeout".to_string()),
            AccessError::AccessDenied {
                pid: Pid::new("obj"),
                permission: Permission::ViewOriginal,
            },
            AccessError::Config("bad key".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_denied_names_permission_and_object() {
        let err = AccessError::AccessDenied {
            pid: Pid::new("work-1"),
            permission: Permission::Destroy,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("work-1"));
        assert!(rendered.contains("destroy"));
    }
}
