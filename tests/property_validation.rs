//! Property-based tests for ACL validation and inheritance
//!
//! Uses proptest to check that accepted assignments read back intact and that
//! patron access never widens below the level that first grants it.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use repo_access::{
    restate_patron_roles, AclProperty, AclStatement, AclValidator, DirectAclRecord, ObjectType,
    PatronRoles, Pid, PrincipalClassifier, RawAclFacts, Role, AUTHENTICATED_PRINCIPAL,
    PUBLIC_PRINCIPAL,
};
use std::collections::BTreeMap;

const PATRON_PRINCIPALS: &[&str] = &[
    PUBLIC_PRINCIPAL,
    AUTHENTICATED_PRINCIPAL,
    "patron:onsite",
    "patron:alumni",
];
const STAFF_PRINCIPALS: &[&str] = &["curators", "processors", "catalogers"];

fn patron_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![
        Role::None,
        Role::CanViewMetadata,
        Role::CanViewReducedQuality,
        Role::CanViewAccessCopies,
        Role::CanViewOriginals,
    ])
}

fn collection_staff_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![
        Role::CanAccess,
        Role::CanDescribe,
        Role::CanIngest,
        Role::CanProcess,
        Role::CanManage,
    ])
}

fn unit_staff_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![
        Role::CanAccess,
        Role::CanDescribe,
        Role::CanIngest,
        Role::CanProcess,
        Role::CanManage,
        Role::UnitOwner,
    ])
}

fn content_type() -> impl Strategy<Value = ObjectType> {
    prop::sample::select(vec![ObjectType::Folder, ObjectType::Work, ObjectType::FileObject])
}

fn owned(roles: &BTreeMap<&str, Role>) -> BTreeMap<String, Role> {
    roles
        .iter()
        .map(|(principal, role)| (principal.to_string(), *role))
        .collect()
}

fn patron_map() -> impl Strategy<Value = PatronRoles> {
    prop::collection::btree_map(
        prop::sample::select(PATRON_PRINCIPALS.to_vec()).prop_map(str::to_string),
        patron_role(),
        0..4,
    )
}

fn to_raw(object_type: ObjectType, statements: &[AclStatement]) -> RawAclFacts {
    let mut raw = RawAclFacts::empty(object_type);
    for statement in statements {
        match statement.property {
            AclProperty::Role(role) => raw
                .assignments
                .push((statement.value.clone(), role.id().to_string())),
            AclProperty::EmbargoUntil => raw.embargo_until = Some(statement.value.clone()),
            AclProperty::MarkedForDeletion => {
                raw.marked_for_deletion = statement.value == "true"
            }
        }
    }
    raw
}

proptest! {
    #[test]
    fn prop_valid_collection_assignments_read_back(
        patrons in prop::collection::btree_map(
            prop::sample::select(PATRON_PRINCIPALS.to_vec()),
            patron_role(),
            0..4,
        ),
        staff in prop::collection::btree_map(
            prop::sample::select(STAFF_PRINCIPALS.to_vec()),
            collection_staff_role(),
            0..3,
        ),
    ) {
        let statements: Vec<AclStatement> = patrons
            .iter()
            .chain(staff.iter())
            .map(|(principal, role)| AclStatement::role(*principal, *role))
            .collect();

        let validator = AclValidator::default();
        prop_assert!(validator.validate(ObjectType::Collection, &statements).is_ok());

        let classifier = PrincipalClassifier::default();
        let record = DirectAclRecord::parse(
            &Pid::new("coll"),
            to_raw(ObjectType::Collection, &statements),
        );
        prop_assert_eq!(record.patron_roles(&classifier), owned(&patrons));
        prop_assert_eq!(record.staff_roles(&classifier), owned(&staff));
    }

    #[test]
    fn prop_valid_admin_unit_assignments_read_back(
        staff in prop::collection::btree_map(
            prop::sample::select(STAFF_PRINCIPALS.to_vec()),
            unit_staff_role(),
            0..3,
        ),
    ) {
        let statements: Vec<AclStatement> = staff
            .iter()
            .map(|(principal, role)| AclStatement::role(*principal, *role))
            .collect();

        prop_assert!(AclValidator::default()
            .validate(ObjectType::AdminUnit, &statements)
            .is_ok());

        let classifier = PrincipalClassifier::default();
        let record = DirectAclRecord::parse(
            &Pid::new("unit"),
            to_raw(ObjectType::AdminUnit, &statements),
        );
        prop_assert_eq!(record.staff_roles(&classifier), owned(&staff));
        prop_assert!(record.patron_roles(&classifier).is_empty());
    }

    #[test]
    fn prop_valid_content_assignments_read_back(
        object_type in content_type(),
        patrons in prop::collection::btree_map(
            prop::sample::select(PATRON_PRINCIPALS.to_vec()),
            patron_role(),
            0..4,
        ),
        embargo_days in prop::option::of(1i64..20_000),
        deleted in prop::option::of(any::<bool>()),
    ) {
        let mut statements: Vec<AclStatement> = patrons
            .iter()
            .map(|(principal, role)| AclStatement::role(*principal, *role))
            .collect();
        let embargo = embargo_days.map(|days| {
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
        });
        if let Some(until) = embargo {
            statements.push(AclStatement::embargo(until));
        }
        if let Some(flag) = deleted {
            statements.push(AclStatement::marked_for_deletion(flag));
        }

        prop_assert!(AclValidator::default().validate(object_type, &statements).is_ok());

        let classifier = PrincipalClassifier::default();
        let record = DirectAclRecord::parse(&Pid::new("obj"), to_raw(object_type, &statements));
        prop_assert_eq!(record.patron_roles(&classifier), owned(&patrons));
        prop_assert!(record.staff_roles(&classifier).is_empty());
        prop_assert_eq!(record.embargo_until, embargo);
        prop_assert_eq!(record.marked_for_deletion, deleted.unwrap_or(false));
    }

    #[test]
    fn prop_staff_principal_with_patron_role_always_rejected(
        principal in prop::sample::select(STAFF_PRINCIPALS.to_vec()),
        role in patron_role(),
    ) {
        let validator = AclValidator::default();
        let result = validator.validate(ObjectType::Work, &[AclStatement::role(principal, role)]);
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_restatement_never_widens(
        inherited in patron_map(),
        local in patron_map(),
    ) {
        let restated = restate_patron_roles(&local, Some(&inherited));
        let ceiling = inherited.values().map(Role::rank).max();

        for (principal, role) in &restated {
            // Never stronger than the strongest inherited role
            prop_assert!(Some(role.rank()) <= ceiling);
            if let Some(own) = inherited.get(principal) {
                prop_assert!(role.rank() <= own.rank());
            }
            if !local.is_empty() {
                prop_assert!(local.contains_key(principal));
            }
        }
    }

    #[test]
    fn prop_silent_node_passes_roles_through(inherited in patron_map()) {
        let restated = restate_patron_roles(&BTreeMap::new(), Some(&inherited));
        prop_assert_eq!(restated, inherited);
    }
}
