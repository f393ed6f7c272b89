mod common;

use common::Fixture;
use rc_core::membership::{service_add, service_delete, service_in_runlevel, services_in_runlevel};
use rc_core::runlevel::{runlevel_exists, runlevel_get, runlevel_list, runlevel_set, BOOT, SINGLE, SYSINIT};
use rc_core::RcError;

#[test]
fn softlevel_round_trips_and_defaults_to_sysinit() {
    let fixture = Fixture::new();
    assert_eq!(runlevel_get(fixture.ctx()).unwrap(), SYSINIT);
    runlevel_set(fixture.ctx(), "default").unwrap();
    assert_eq!(runlevel_get(fixture.ctx()).unwrap(), "default");
}

#[test]
fn runlevel_list_reflects_directories_present() {
    let fixture = Fixture::new();
    fixture.add_runlevel("default");
    fixture.add_runlevel("single");
    let mut levels = runlevel_list(fixture.ctx()).unwrap();
    levels.sort();
    assert_eq!(levels, vec!["default".to_string(), "single".to_string()]);
    assert!(runlevel_exists(fixture.ctx(), "default"));
}

#[test]
fn membership_add_then_delete_round_trips() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    fixture.add_runlevel("default");
    service_add(fixture.ctx(), "default", "foo").unwrap();
    assert!(service_in_runlevel(fixture.ctx(), "foo", "default"));
    assert_eq!(
        services_in_runlevel(fixture.ctx(), Some("default")).unwrap(),
        vec!["foo".to_string()]
    );

    service_delete(fixture.ctx(), "default", "foo").unwrap();
    assert!(!service_in_runlevel(fixture.ctx(), "foo", "default"));
}

#[test]
fn boot_level_guard_rejects_services_outside_the_primary_init_dir() {
    let fixture = Fixture::new();
    fixture.add_init_local_script("foo");
    fixture.add_runlevel(BOOT);
    let err = service_add(fixture.ctx(), BOOT, "foo").unwrap_err();
    assert!(matches!(err, RcError::PermissionDenied(_)));

    fixture.add_init_script("bar");
    service_add(fixture.ctx(), BOOT, "bar").unwrap();
    assert!(service_in_runlevel(fixture.ctx(), "bar", BOOT));
}

#[test]
fn pseudo_runlevels_are_always_empty_and_absent_level_unions_both_dirs() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    fixture.add_init_local_script("bar");

    assert!(services_in_runlevel(fixture.ctx(), Some(SYSINIT)).unwrap().is_empty());
    assert!(services_in_runlevel(fixture.ctx(), Some(SINGLE)).unwrap().is_empty());

    let names = services_in_runlevel(fixture.ctx(), None).unwrap();
    assert_eq!(names, vec!["bar".to_string(), "foo".to_string()]);
}
