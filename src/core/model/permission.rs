//! Capabilities that roles grant

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named capability checked against an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    ViewMetadata,
    ViewReducedResImages,
    ViewAccessCopies,
    ViewOriginal,
    /// See objects hidden from patrons
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
}

impl Permission {
    /// Stable identifier used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewMetadata => "viewMetadata",
            Permission::ViewReducedResImages => "viewReducedResImages",
            Permission::ViewAccessCopies => "viewAccessCopies",
            Permission::ViewOriginal => "viewOriginal",
            Permission::ViewHidden => "viewHidden",
            Permission::EditDescription => "editDescription",
            Permission::BulkUpdateDescription => "bulkUpdateDescription",
            Permission::Ingest => "ingest",
            Permission::Move => "move",
            Permission::MarkForDeletion => "markForDeletion",
            Permission::EditResourceType => "editResourceType",
            Permission::Reindex => "reindex",
            Permission::RunEnhancements => "runEnhancements",
            Permission::ChangePatronAccess => "changePatronAccess",
            Permission::AssignStaffRoles => "assignStaffRoles",
            Permission::CreateCollection => "createCollection",
            Permission::Destroy => "destroy",
            Permission::MarkForDeletionUnit => "markForDeletionUnit",
            Permission::DestroyUnit => "destroyUnit",
            Permission::CreateAdminUnit => "createAdminUnit",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
