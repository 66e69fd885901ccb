//! Collaborator contracts at the boundary of the access layer
//!
//! The repository itself (object persistence and the containment graph) lives
//! outside this crate. Access decisions only need two things from it: the raw
//! ACL facts carried directly by one object, and the chain of ancestors above
//! an object.

mod memory;

pub use memory::MemoryRepository;

use crate::core::model::{ObjectType, Pid};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// ACL facts exactly as the repository holds them for one object
///
/// Values are unvalidated strings; parsing into typed form happens in
/// [`DirectAclRecord::parse`](crate::core::acl::DirectAclRecord::parse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAclFacts {
    pub object_type: ObjectType,

    /// `(principal, role id)` pairs in store order
    #[serde(default)]
    pub assignments: Vec<(String, String)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo_until: Option<String>,

    #[serde(default)]
    pub marked_for_deletion: bool,

    /// Object carries the tombstone type marker
    #[serde(default)]
    pub tombstone: bool,
}

impl RawAclFacts {
    /// Facts for an object with no ACL properties at all
    pub fn empty(object_type: ObjectType) -> Self {
        RawAclFacts {
            object_type,
            assignments: Vec::new(),
            embargo_until: None,
            marked_for_deletion: false,
            tombstone: false,
        }
    }
}

/// Reads one object's raw, non-inherited ACL facts
pub trait RepositoryObjectAccessor: Send + Sync {
    /// Fetch facts for `pid`.
    ///
    /// Returns `ObjectNotFound` for unknown objects and `BackingStore` for
    /// any failure of the store itself.
    fn fetch_acl_facts(&self, pid: &Pid) -> Result<RawAclFacts>;
}

/// Resolves the containment chain above an object
pub trait AncestorPathProvider: Send + Sync {
    /// Ancestors of `pid`, root first, excluding `pid` itself.
    ///
    /// An empty result for anything other than the content root means the
    /// repository graph is broken.
    fn ancestor_pids(&self, pid: &Pid) -> Result<Vec<Pid>>;
}
