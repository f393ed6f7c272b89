mod common;

use common::Fixture;
use rc_core::executor::{service_start, service_stop, ExecOutcome};
use rc_core::state::{mark, state, MarkTarget, PrimaryState};

#[test]
fn start_forks_creates_exclusive_fifo_and_reaps_the_child() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");

    let outcome = service_start(fixture.ctx(), "foo").unwrap();
    match outcome {
        ExecOutcome::Spawned(pid) => {
            let status = nix::sys::wait::waitpid(pid, None);
            assert!(status.is_ok());
        }
        other => panic!("expected Spawned, got {other:?}"),
    }
}

#[test]
fn start_is_a_no_op_when_the_service_is_not_stopped() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    mark(fixture.ctx(), "foo", MarkTarget::Started).unwrap();
    assert_eq!(service_start(fixture.ctx(), "foo").unwrap(), ExecOutcome::NoOp);
}

#[test]
fn start_refuses_a_failed_service() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    mark(fixture.ctx(), "foo", MarkTarget::Failed).unwrap();
    assert_eq!(service_start(fixture.ctx(), "foo").unwrap(), ExecOutcome::Failed);
}

#[test]
fn stop_is_a_no_op_when_already_stopped() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    assert_eq!(state(fixture.ctx(), "foo").primary, PrimaryState::Stopped);
    assert_eq!(service_stop(fixture.ctx(), "foo").unwrap(), ExecOutcome::NoOp);
}
