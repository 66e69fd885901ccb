//! Object access control
//!
//! Resolves what principals may do with an object from the ACL facts carried
//! by the object and its ancestors:
//! - Cached reads of each object's direct facts (LRU bounded, TTL refreshed)
//! - Additive staff roles, ratchet-down patron roles
//! - Nearest-wins embargoes and inherited deletion
//! - Yes/no permission checks over the resolved roles

mod accessor;
mod cache;
mod chain;
mod evaluator;
mod patron;
mod record;
mod resolver;

pub use accessor::ObjectAclAccessor;
pub use cache::AclCache;
pub use chain::{AclChain, ChainNode, PatronResolution};
pub use evaluator::PermissionEvaluator;
pub use patron::{restate_patron_roles, PatronRoles};
pub use record::{parse_embargo, DirectAclRecord};
pub use resolver::InheritedAclResolver;
