//! Global role configuration, from TOML through to access decisions

use repo_access::{
    AccessConfig, AccessControlService, GlobalPermissionAuthority, MemoryRepository, ObjectType,
    Permission, Pid, PrincipalSet, Role, PUBLIC_PRINCIPAL,
};
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

const CONFIG: &str = r#"
patron_namespace = "patron:"

[cache]
max_entries = 64
ttl_secs = 30

[properties]
repository.name = "test"

[properties.acl.globalRoles]
administrator = "repo_admins"
canAccess = ["auditors", "reviewers"]
"#;

fn caller(principals: &[&str]) -> PrincipalSet {
    principals.iter().copied().collect()
}

#[test]
fn test_authority_from_toml_properties() {
    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    let authority =
        GlobalPermissionAuthority::from_properties(&config.flat_properties(), &config.classifier())
            .unwrap();

    assert_eq!(authority.len(), 3);
    assert_eq!(authority.global_role_of("reviewers"), Some(Role::CanAccess));
    assert_eq!(
        authority.get_global_user_roles(&caller(&["repo_admins", "auditors", "nobody"])),
        BTreeSet::from([Role::CanAccess, Role::Administrator])
    );
    assert!(authority.has_global_permission(&caller(&["repo_admins"]), Permission::CreateAdminUnit));
    assert!(!authority.has_global_permission(&caller(&["auditors"]), Permission::EditDescription));
}

#[test]
fn test_global_roles_apply_to_every_object() {
    let repo = Arc::new(MemoryRepository::new());
    let unit = repo.add_object("unit", ObjectType::AdminUnit, Some(&Pid::content_root()));
    let coll = repo.add_object("coll", ObjectType::Collection, Some(&unit));
    let work = repo.add_object("work", ObjectType::Work, Some(&coll));
    // Patrons are locked out entirely
    repo.assign(&coll, PUBLIC_PRINCIPAL, Role::None);
    repo.mark_for_deletion(&work, true);

    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    let service = AccessControlService::from_config(&config, repo).unwrap();

    let auditors = caller(&["auditors"]);
    assert!(service.has_access(&work, &auditors, Permission::ViewHidden).unwrap());
    assert!(service.has_access(&coll, &auditors, Permission::ViewOriginal).unwrap());
    assert!(!service.has_access(&work, &auditors, Permission::Move).unwrap());

    assert!(service
        .assert_has_access(&unit, &caller(&["repo_admins"]), Permission::DestroyUnit)
        .is_ok());
}

#[test]
fn test_config_file_with_conflicting_roles_fails_startup() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[properties]
"acl.globalRoles.canManage" = "ops"
"acl.globalRoles.canAccess" = "ops, auditors"
"#
    )
    .unwrap();

    let config = AccessConfig::load(file.path()).unwrap();
    let err = AccessControlService::from_config(&config, Arc::new(MemoryRepository::new()))
        .err()
        .unwrap();

    assert!(err.is_invalid_assignment());
    assert!(err.to_string().contains("ops"));
}

#[test]
fn test_patron_principal_in_custom_namespace_rejected() {
    let config = AccessConfig::from_toml_str(
        r#"
patron_namespace = "lib:"

[properties]
"acl.globalRoles.canDescribe" = "lib:friends"
"#,
    )
    .unwrap();

    let err = GlobalPermissionAuthority::from_properties(
        &config.flat_properties(),
        &config.classifier(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("lib:friends"));
}
