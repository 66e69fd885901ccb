//! Patron role restatement
//!
//! Patron access ratchets down through the hierarchy. A node that says
//! nothing about patrons passes its parent's access through untouched. A node
//! that says anything restates the whole set: principals it does not mention
//! lose access, and principals it does mention can only keep or lower what
//! they inherited.
//!
//! Patron principals nest: every authenticated user is also part of the
//! public, and every named patron group is made of authenticated users. A
//! principal that inherited nothing itself is capped by the strongest role
//! inherited by a broader principal that contains it.

use crate::core::model::{Role, AUTHENTICATED_PRINCIPAL, PUBLIC_PRINCIPAL};
use std::collections::BTreeMap;

/// Effective patron roles by principal
pub type PatronRoles = BTreeMap<String, Role>;

/// Apply one node's local patron assignments on top of its inherited roles
///
/// `inherited` is `None` when no ancestor has ever stated patron roles. That
/// node is the origin level and may introduce principals freely. Below it, a
/// principal keeps at most what it, or a broader principal containing it,
/// inherited; with no such baseline it is dropped. This holds even when the
/// inherited set is empty because an ancestor revoked everything.
///
/// An empty `local` returns the inherited roles unchanged.
pub fn restate_patron_roles(local: &PatronRoles, inherited: Option<&PatronRoles>) -> PatronRoles {
    if local.is_empty() {
        return inherited.cloned().unwrap_or_default();
    }

    let mut restated = PatronRoles::new();
    for (principal, &role) in local {
        if role == Role::None {
            continue;
        }

        let effective = match inherited {
            None => Some(role),
            Some(ancestor_roles) => {
                inherited_baseline(principal, ancestor_roles).map(|cap| role.weaker_of(cap))
            }
        };

        if let Some(effective) = effective {
            restated.insert(principal.clone(), effective);
        }
    }

    restated
}

/// Role a principal is allowed to keep below the origin level
fn inherited_baseline(principal: &str, inherited: &PatronRoles) -> Option<Role> {
    if let Some(&role) = inherited.get(principal) {
        return Some(role);
    }

    broader_principals(principal)
        .iter()
        .filter_map(|broader| inherited.get(*broader).copied())
        .max_by_key(Role::rank)
}

fn broader_principals(principal: &str) -> &'static [&'static str] {
    match principal {
        PUBLIC_PRINCIPAL => &[],
        AUTHENTICATED_PRINCIPAL => &[PUBLIC_PRINCIPAL],
        _ => &[AUTHENTICATED_PRINCIPAL, PUBLIC_PRINCIPAL],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(pairs: &[(&str, Role)]) -> PatronRoles {
        pairs.iter().map(|(p, r)| (p.to_string(), *r)).collect()
    }

    #[test]
    fn test_empty_local_passes_through() {
        let inherited = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewAccessCopies)]);
        assert_eq!(
            restate_patron_roles(&PatronRoles::new(), Some(&inherited)),
            inherited
        );
        assert!(restate_patron_roles(&PatronRoles::new(), None).is_empty());
    }

    #[test]
    fn test_origin_grants_as_given() {
        let local = roles(&[
            (PUBLIC_PRINCIPAL, Role::CanViewMetadata),
            (AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals),
            ("patron:reading_room", Role::None),
        ]);
        assert_eq!(
            restate_patron_roles(&local, None),
            roles(&[
                (PUBLIC_PRINCIPAL, Role::CanViewMetadata),
                (AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals),
            ])
        );
    }

    #[test]
    fn test_elevation_is_capped() {
        let inherited = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewAccessCopies)]);
        let local = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewOriginals)]);
        assert_eq!(
            restate_patron_roles(&local, Some(&inherited)),
            roles(&[(PUBLIC_PRINCIPAL, Role::CanViewAccessCopies)])
        );
    }

    #[test]
    fn test_downgrade_is_honored() {
        let inherited = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewOriginals)]);
        let local = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewReducedQuality)]);
        assert_eq!(
            restate_patron_roles(&local, Some(&inherited)),
            roles(&[(PUBLIC_PRINCIPAL, Role::CanViewReducedQuality)])
        );
    }

    #[test]
    fn test_none_revokes() {
        let inherited = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewMetadata)]);
        let local = roles(&[(PUBLIC_PRINCIPAL, Role::None)]);
        assert!(restate_patron_roles(&local, Some(&inherited)).is_empty());
    }

    #[test]
    fn test_unmentioned_principals_are_dropped() {
        let inherited = roles(&[
            (PUBLIC_PRINCIPAL, Role::CanViewMetadata),
            (AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals),
        ]);
        let local = roles(&[(AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals)]);
        assert_eq!(
            restate_patron_roles(&local, Some(&inherited)),
            roles(&[(AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals)])
        );
    }

    #[test]
    fn test_new_group_capped_by_broader_principal() {
        let inherited = roles(&[
            (PUBLIC_PRINCIPAL, Role::CanViewMetadata),
            (AUTHENTICATED_PRINCIPAL, Role::CanViewAccessCopies),
        ]);
        let local = roles(&[("patron:group", Role::CanViewOriginals)]);
        assert_eq!(
            restate_patron_roles(&local, Some(&inherited)),
            roles(&[("patron:group", Role::CanViewAccessCopies)])
        );
    }

    #[test]
    fn test_authenticated_capped_by_public() {
        let inherited = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewReducedQuality)]);
        let local = roles(&[(AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals)]);
        assert_eq!(
            restate_patron_roles(&local, Some(&inherited)),
            roles(&[(AUTHENTICATED_PRINCIPAL, Role::CanViewReducedQuality)])
        );
    }

    #[test]
    fn test_new_principal_without_baseline_is_dropped() {
        // a narrower grant above does not extend to the wider public
        let inherited = roles(&[(AUTHENTICATED_PRINCIPAL, Role::CanViewOriginals)]);
        let local = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewMetadata)]);
        assert!(restate_patron_roles(&local, Some(&inherited)).is_empty());

        let inherited = roles(&[("patron:other", Role::CanViewOriginals)]);
        let local = roles(&[("patron:group", Role::CanViewMetadata)]);
        assert!(restate_patron_roles(&local, Some(&inherited)).is_empty());
    }

    #[test]
    fn test_cannot_regrant_after_full_revocation() {
        let revoked_above = PatronRoles::new();
        let local = roles(&[(PUBLIC_PRINCIPAL, Role::CanViewOriginals)]);
        assert!(restate_patron_roles(&local, Some(&revoked_above)).is_empty());
    }
}
