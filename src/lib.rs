//! # repo-access - Access Control for Hierarchical Digital Repositories
//!
//! `repo-access` decides what principals may do with objects in a digital
//! object repository arranged as a containment tree:
//!
//! - **Staff roles** granted on administrative units and collections, additive
//!   down the tree
//! - **Patron roles** on collections and content, which may only narrow below
//!   the first object that states them
//! - **Embargoes** (nearest wins) and **deletion marks** (inherited)
//! - **Global roles** from configuration that apply repository-wide
//! - **Write validation** of proposed ACL assignments
//!
//! ## Quick Start
//!
//! ```rust
//! use repo_access::{
//!     AccessConfig, AccessControlService, MemoryRepository, ObjectType, Permission, Pid,
//!     PrincipalSet, Result, Role,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let repo = Arc::new(MemoryRepository::new());
//! let unit = repo.add_object("unit", ObjectType::AdminUnit, Some(&Pid::content_root()));
//! let coll = repo.add_object("coll", ObjectType::Collection, Some(&unit));
//! let work = repo.add_object("work", ObjectType::Work, Some(&coll));
//!
//! repo.assign(&unit, "curators", Role::CanManage);
//! repo.assign(&coll, "everyone", Role::CanViewMetadata);
//!
//! let service = AccessControlService::from_config(&AccessConfig::default(), repo)?;
//!
//! let curators: PrincipalSet = ["curators"].into_iter().collect();
//! assert!(service.has_access(&work, &curators, Permission::Destroy)?);
//!
//! let public: PrincipalSet = ["everyone"].into_iter().collect();
//! assert!(!service.has_access(&work, &public, Permission::ViewOriginal)?);
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level pieces ([`InheritedAclResolver`], [`PermissionEvaluator`],
//! [`GlobalPermissionAuthority`], [`AclValidator`]) are usable on their own.

pub mod core;
pub mod error;

pub use crate::core::{
    acl::{
        parse_embargo, restate_patron_roles, AclCache, AclChain, ChainNode, DirectAclRecord,
        InheritedAclResolver, ObjectAclAccessor, PatronResolution, PatronRoles,
        PermissionEvaluator,
    },
    config::{AccessConfig, CacheConfig},
    global::{GlobalPermissionAuthority, GLOBAL_ROLES_PREFIX},
    model::{
        ObjectType, Permission, Pid, PrincipalClassifier, PrincipalKind, PrincipalSet, Role,
        RoleAssignment, RoleCategory, AUTHENTICATED_PRINCIPAL, CONTENT_ROOT_ID,
        DEFAULT_PATRON_NAMESPACE, PUBLIC_PRINCIPAL,
    },
    service::AccessControlService,
    store::{AncestorPathProvider, MemoryRepository, RawAclFacts, RepositoryObjectAccessor},
    validation::{AclProperty, AclStatement, AclValidator},
};
pub use crate::error::{AccessError, Result};
