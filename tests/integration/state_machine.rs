mod common;

use common::Fixture;
use rc_core::schedule::schedule_start;
use rc_core::state::{mark, state, MarkTarget, PrimaryState};

#[test]
fn stop_from_inactive_preserves_was_inactive_then_clears_on_stop() {
    let fixture = Fixture::new();
    let script = fixture.add_init_script("foo");
    fixture.link_state_marker("inactive", "foo", script.to_str().unwrap());

    assert!(mark(fixture.ctx(), "foo", MarkTarget::Stopping).unwrap());
    assert!(fixture.has_state_marker("stopping", "foo"));
    assert!(fixture.has_state_marker("wasinactive", "foo"));
    assert!(!fixture.has_state_marker("inactive", "foo"));

    assert!(mark(fixture.ctx(), "foo", MarkTarget::Stopped).unwrap());
    assert!(!fixture.has_state_marker("stopped", "foo"));
    assert!(!fixture.has_state_marker("stopping", "foo"));
    assert!(!fixture.has_state_marker("wasinactive", "foo"));
    assert_eq!(state(fixture.ctx(), "foo").primary, PrimaryState::Stopped);
}

#[test]
fn derived_scheduled_bit_appears_only_while_stopped() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    fixture.add_init_script("bar");

    schedule_start(fixture.ctx(), "foo", "bar").unwrap();
    let s = state(fixture.ctx(), "bar");
    assert_eq!(s.primary, PrimaryState::Stopped);
    assert!(s.modifiers.scheduled);

    mark(fixture.ctx(), "bar", MarkTarget::Started).unwrap();
    let s = state(fixture.ctx(), "bar");
    assert!(!s.modifiers.scheduled, "terminal state prunes the schedule entry");
}

#[test]
fn exactly_one_primary_bit_in_quiescent_reads() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    for target in [
        MarkTarget::Started,
        MarkTarget::Starting,
        MarkTarget::Stopping,
        MarkTarget::Inactive,
        MarkTarget::Stopped,
    ] {
        mark(fixture.ctx(), "foo", target).unwrap();
        let s = state(fixture.ctx(), "foo");
        let primaries = [
            fixture.has_state_marker("started", "foo"),
            fixture.has_state_marker("starting", "foo"),
            fixture.has_state_marker("stopping", "foo"),
            fixture.has_state_marker("inactive", "foo"),
        ];
        assert!(
            primaries.iter().filter(|p| **p).count() <= 1,
            "at most one primary marker after mark({target:?}), got state {s:?}"
        );
    }
}

#[test]
fn mark_stopped_clears_options_daemons_and_outgoing_schedule() {
    let fixture = Fixture::new();
    fixture.add_init_script("foo");
    fixture.add_init_script("bar");
    rc_core::options::value_set(fixture.ctx(), "foo", "key", "value").unwrap();
    schedule_start(fixture.ctx(), "bar", "foo").unwrap();

    let daemons_dir = fixture.ctx().state_dir().join("daemons").join("foo");
    std::fs::create_dir_all(&daemons_dir).unwrap();

    mark(fixture.ctx(), "foo", MarkTarget::Stopped).unwrap();

    assert_eq!(
        rc_core::options::value_get(fixture.ctx(), "foo", "key").unwrap(),
        None
    );
    assert!(!daemons_dir.exists());
    assert!(!fixture.ctx().state_dir().join("scheduled").join("foo").exists());
    assert!(
        rc_core::schedule::scheduled(fixture.ctx(), "bar").unwrap().is_empty(),
        "the outgoing schedule entry naming the now-stopped service must be pruned"
    );
}
