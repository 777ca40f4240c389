//! Tests for handles
//!
//! A handle must never fail: unknown, reaped or orphaned identities all
//! report "not running".

use std::collections::HashSet;

use super::helpers::{entries, forever, new_log, scripted};
use crate::resumable::{wait_for, Advance};
use crate::runner::{CoroutineId, Handle, Runner, Status};

#[test]
fn test_unknown_identity_is_not_running() {
    let runner = Runner::new();
    let stranger = Handle::detached(CoroutineId::from_raw(42), "stranger");

    assert!(!stranger.is_running());
    assert_eq!(stranger.status(), None);
    assert_eq!(stranger.wait_ticks(), None);
    assert!(!runner.is_running(&stranger));
}

#[test]
fn test_handles_are_scoped_to_their_runner() {
    let log = new_log();
    let mut a = Runner::new();
    let mut b = Runner::new();
    let ha = a.start("worker", forever(&log, "a"), 0);
    let hb = b.start("worker", forever(&log, "b"), 0);
    a.update();
    b.update();

    assert_ne!(ha.id(), hb.id());
    assert_ne!(ha, hb);
    assert!(!b.is_running(&ha));
    assert!(!a.is_running(&hb));

    assert!(!b.stop_handle(&ha));
    assert!(!b.spawner().stop_handle(&ha));
    assert!(hb.is_running());
    assert!(ha.is_running());

    assert!(a.stop_handle(&ha));
    assert!(!ha.is_running());
    assert!(b.is_running(&hb));
}

#[test]
fn test_foreign_handle_with_colliding_id_is_ignored() {
    let log = new_log();
    let mut runner = Runner::new();
    let real = runner.start("target", forever(&log, "target"), 0);
    runner.update();

    let forged = Handle::detached(real.id(), "target");

    assert!(!runner.is_running(&forged));
    assert!(!runner.stop_handle(&forged));
    assert!(!runner.spawner().stop_handle(&forged));
    assert!(runner.is_running(&real));
}

#[test]
fn test_handle_outlives_runner() {
    let log = new_log();
    let mut runner = Runner::new();
    let handle = runner.start("orphan", forever(&log, "orphan"), 0);
    assert!(handle.is_running());

    drop(runner);

    assert!(!handle.is_running());
    assert_eq!(handle.status(), None);
    assert!(!handle.stop());
}

#[test]
fn test_handle_identity_and_name() {
    let log = new_log();
    let mut runner = Runner::new();
    let first = runner.start("same", forever(&log, "same"), 0);
    let second = runner.start("same", forever(&log, "same"), 0);

    assert_eq!(first.name(), "same");
    assert_ne!(first, second);
    assert!(first.id() < second.id());
    assert_eq!(first, first.clone());

    let set: HashSet<Handle> = [first.clone(), second, first].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_runner_is_running_matches_handle() {
    let log = new_log();
    let mut runner = Runner::new();
    let handle = runner.start("q", scripted(&log, "q", vec![]), 0);
    assert!(runner.is_running(&handle));

    runner.update();
    assert!(!runner.is_running(&handle));
    assert_eq!(handle.status(), Some(Status::Completed));
}

#[test]
fn test_find_returns_all_instances_with_name() {
    let log = new_log();
    let mut runner = Runner::new();
    let a1 = runner.start("a", forever(&log, "a"), 0);
    runner.start("b", forever(&log, "b"), 0);
    let a2 = runner.start("a", forever(&log, "a"), 0);

    let found = runner.find("a");
    assert_eq!(found, vec![a1, a2]);
    assert!(runner.find("missing").is_empty());
}

#[test]
fn test_wait_for_resumes_after_target_finishes() {
    let log = new_log();
    let mut runner = Runner::new();
    let worker = runner.start(
        "worker",
        scripted(&log, "worker", vec![Advance::wait(1)]),
        0,
    );
    runner.start(
        "waiter",
        scripted(&log, "waiter", vec![Advance::delegate(wait_for(worker.clone()))]),
        0,
    );

    runner.update(); // worker:0 waits 1, waiter:0 pushes wait_for
    runner.update(); // worker waiting, wait_for sees it running
    runner.update(); // worker:1 completes earlier in the pass, so wait_for ends
    assert_eq!(worker.status(), Some(Status::Completed));
    assert_eq!(entries(&log), vec!["worker:0", "waiter:0", "worker:1"]);

    runner.update(); // waiter:1
    assert_eq!(
        entries(&log),
        vec!["worker:0", "waiter:0", "worker:1", "waiter:1"]
    );
}
