//! Roles, role categories and the role to permission mapping
//!
//! Roles are grouped into two categories. Within a category they are ordered
//! by permission-set inclusion: every higher role grants a superset of the
//! permissions of each lower role. Ordering across categories is meaningless.

use super::Permission;
use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use Permission::*;

/// Category a role belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// End-user visibility roles (ratchet down through the hierarchy)
    Patron,
    /// Staff roles (additive through the hierarchy)
    Staff,
}

/// A named role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Explicit revocation of patron access
    #[serde(rename = "none")]
    None,
    CanViewMetadata,
    CanViewReducedQuality,
    CanViewAccessCopies,
    CanViewOriginals,
    CanAccess,
    CanDescribe,
    CanIngest,
    CanProcess,
    CanManage,
    UnitOwner,
    /// Only grantable through global configuration
    Administrator,
}

const PATRON_METADATA: &[Permission] = &[ViewMetadata];
const PATRON_REDUCED: &[Permission] = &[ViewMetadata, ViewReducedResImages];
const PATRON_ACCESS_COPIES: &[Permission] = &[ViewMetadata, ViewReducedResImages, ViewAccessCopies];
const PATRON_ORIGINALS: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
];

const STAFF_ACCESS: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
];
const STAFF_DESCRIBE: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
];
const STAFF_INGEST: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
];
const STAFF_PROCESS: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    EditResourceType,
    Reindex,
    RunEnhancements,
];
const STAFF_MANAGE: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    EditResourceType,
    Reindex,
    RunEnhancements,
    ChangePatronAccess,
    AssignStaffRoles,
    CreateCollection,
    Destroy,
];
const STAFF_UNIT_OWNER: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    EditResourceType,
    Reindex,
    RunEnhancements,
    ChangePatronAccess,
    AssignStaffRoles,
    CreateCollection,
    Destroy,
    MarkForDeletionUnit,
    DestroyUnit,
];
const STAFF_ADMINISTRATOR: &[Permission] = &[
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    EditResourceType,
    Reindex,
    RunEnhancements,
    ChangePatronAccess,
    AssignStaffRoles,
    CreateCollection,
    Destroy,
    MarkForDeletionUnit,
    DestroyUnit,
    CreateAdminUnit,
];

impl Role {
    /// Every role, patron roles first, each category in ascending order
    pub const ALL: [Role; 12] = [
        Role::None,
        Role::CanViewMetadata,
        Role::CanViewReducedQuality,
        Role::CanViewAccessCopies,
        Role::CanViewOriginals,
        Role::CanAccess,
        Role::CanDescribe,
        Role::CanIngest,
        Role::CanProcess,
        Role::CanManage,
        Role::UnitOwner,
        Role::Administrator,
    ];

    /// Lowest patron role that still grants visibility. Embargoes cap access here.
    pub const LOWEST_VISIBLE_PATRON: Role = Role::CanViewMetadata;

    pub fn category(&self) -> RoleCategory {
        match self {
            Role::None
            | Role::CanViewMetadata
            | Role::CanViewReducedQuality
            | Role::CanViewAccessCopies
            | Role::CanViewOriginals => RoleCategory::Patron,
            _ => RoleCategory::Staff,
        }
    }

    pub fn is_patron(&self) -> bool {
        self.category() == RoleCategory::Patron
    }

    pub fn is_staff(&self) -> bool {
        self.category() == RoleCategory::Staff
    }

    /// Position within the role's own category, 0 being the weakest
    pub fn rank(&self) -> u8 {
        match self {
            Role::None => 0,
            Role::CanViewMetadata => 1,
            Role::CanViewReducedQuality => 2,
            Role::CanViewAccessCopies => 3,
            Role::CanViewOriginals => 4,
            Role::CanAccess => 0,
            Role::CanDescribe => 1,
            Role::CanIngest => 2,
            Role::CanProcess => 3,
            Role::CanManage => 4,
            Role::UnitOwner => 5,
            Role::Administrator => 6,
        }
    }

    /// The weaker of two roles from the same category
    pub fn weaker_of(self, other: Role) -> Role {
        debug_assert_eq!(self.category(), other.category());
        if other.rank() < self.rank() {
            other
        } else {
            self
        }
    }

    /// Permissions granted by this role
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::None => &[],
            Role::CanViewMetadata => PATRON_METADATA,
            Role::CanViewReducedQuality => PATRON_REDUCED,
            Role::CanViewAccessCopies => PATRON_ACCESS_COPIES,
            Role::CanViewOriginals => PATRON_ORIGINALS,
            Role::CanAccess => STAFF_ACCESS,
            Role::CanDescribe => STAFF_DESCRIBE,
            Role::CanIngest => STAFF_INGEST,
            Role::CanProcess => STAFF_PROCESS,
            Role::CanManage => STAFF_MANAGE,
            Role::UnitOwner => STAFF_UNIT_OWNER,
            Role::Administrator => STAFF_ADMINISTRATOR,
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Stable identifier used in storage, configuration and messages
    pub fn id(&self) -> &'static str {
        match self {
            Role::None => "none",
            Role::CanViewMetadata => "canViewMetadata",
            Role::CanViewReducedQuality => "canViewReducedQuality",
            Role::CanViewAccessCopies => "canViewAccessCopies",
            Role::CanViewOriginals => "canViewOriginals",
            Role::CanAccess => "canAccess",
            Role::CanDescribe => "canDescribe",
            Role::CanIngest => "canIngest",
            Role::CanProcess => "canProcess",
            Role::CanManage => "canManage",
            Role::UnitOwner => "unitOwner",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.id() == s)
            .ok_or_else(|| AccessError::InvalidAssignment(format!("Unknown role: {}", s)))
    }
}
