//! Repository object identity and typing

use super::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the repository root
pub const CONTENT_ROOT_ID: &str = "collections";

/// Repository object identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(String);

impl Pid {
    pub fn new(id: impl Into<String>) -> Self {
        Pid(id.into())
    }

    /// The repository root, which carries no policy of its own
    pub fn content_root() -> Self {
        Pid(CONTENT_ROOT_ID.to_string())
    }

    pub fn is_content_root(&self) -> bool {
        self.0 == CONTENT_ROOT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Pid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Pid {
    fn from(id: &str) -> Self {
        Pid::new(id)
    }
}

impl From<String> for Pid {
    fn from(id: String) -> Self {
        Pid(id)
    }
}

/// Kind of repository object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    ContentRoot,
    AdminUnit,
    Collection,
    Folder,
    Work,
    FileObject,
    /// Anything else the store holds; never ACL-bearing
    Other,
}

impl ObjectType {
    /// Whether patron roles set on this type take part in inheritance
    pub fn accepts_patron_roles(&self) -> bool {
        matches!(
            self,
            ObjectType::Collection | ObjectType::Folder | ObjectType::Work | ObjectType::FileObject
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A role held by a principal, with the object that directly carries it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub principal: String,
    pub role: Role,
    pub assigned_to: Pid,
}

impl RoleAssignment {
    pub fn new(principal: impl Into<String>, role: Role, assigned_to: Pid) -> Self {
        RoleAssignment {
            principal: principal.into(),
            role,
            assigned_to,
        }
    }
}
