mod common;

use common::Fixture;
use rc_core::executor::{service_start, ExecOutcome};
use rc_core::resolve::{service_exists, service_resolve};
use rc_core::state::{state, PrimaryState};
use rc_core::RcError;

#[test]
fn resolver_prefers_started_marker_over_init_dir() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    let started_target = fixture.link_state_marker("started", "foo", "/somewhere/foo");
    assert_eq!(service_resolve(fixture.ctx(), "foo").unwrap(), started_target);
}

#[test]
fn resolver_falls_back_across_both_init_directories() {
    let fixture = Fixture::new();
    let script = fixture.add_init_local_script("bar");
    assert_eq!(service_resolve(fixture.ctx(), "bar").unwrap(), script);
    assert!(service_exists(fixture.ctx(), "bar"));
}

#[test]
fn resolver_reports_not_found_for_unknown_service() {
    let fixture = Fixture::new();
    assert!(matches!(
        service_resolve(fixture.ctx(), "ghost"),
        Err(RcError::NotFound(_))
    ));
}

#[test]
fn executor_is_a_no_op_and_marks_stopped_when_script_is_missing() {
    let fixture = Fixture::new();
    let outcome = service_start(fixture.ctx(), "ghost").unwrap();
    assert_eq!(outcome, ExecOutcome::NoOp);
    assert_eq!(state(fixture.ctx(), "ghost").primary, PrimaryState::Stopped);
}
