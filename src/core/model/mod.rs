//! Role, permission and principal model
//!
//! Pure data: role categories, the role to permission mapping, object typing
//! and principal classification. Nothing here touches the repository.

mod object;
mod permission;
mod principal;
mod role;

pub use object::{ObjectType, Pid, RoleAssignment, CONTENT_ROOT_ID};
pub use permission::Permission;
pub use principal::{
    PrincipalClassifier, PrincipalKind, PrincipalSet, AUTHENTICATED_PRINCIPAL,
    DEFAULT_PATRON_NAMESPACE, PUBLIC_PRINCIPAL,
};
pub use role::{Role, RoleCategory};
