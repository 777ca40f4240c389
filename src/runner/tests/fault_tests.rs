//! Tests for fault isolation
//!
//! A body that breaks the yield contract or panics is stopped on its own;
//! every other coroutine keeps running in the same and later ticks.

use super::helpers::{count_of, forever, new_log, scripted};
use crate::config::RunnerConfig;
use crate::errors::{self, CoroutineFault};
use crate::resumable::{from_fn, Advance, Yielded};
use crate::runner::{Runner, Status};

#[test]
fn test_invalid_yield_stops_only_the_offender() {
    let log = new_log();
    let mut runner = Runner::new();
    let bad = runner.start(
        "bad",
        scripted(&log, "bad", vec![Advance::Suspended(Yielded::Str("nope".into()))]),
        0,
    );
    let good = runner.start("good", forever(&log, "good"), 0);

    runner.update();
    assert_eq!(bad.status(), Some(Status::Stopped));
    assert!(good.is_running());
    assert_eq!(count_of(&log, "good"), 1);

    runner.update();
    runner.update();
    assert_eq!(count_of(&log, "good"), 3);
    assert_eq!(count_of(&log, "bad:0"), 1);
    assert_eq!(bad.status(), None);
}

#[test]
fn test_invalid_yield_fault_names_the_coroutine() {
    let mut runner = Runner::new();
    let bad = runner.start(
        "flaky",
        from_fn(|| Advance::Suspended(Yielded::Bool(true))),
        0,
    );

    runner.update();

    let faults = runner.drain_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].code(), errors::INVALID_YIELD);
    assert_eq!(faults[0].id(), bad.id());
    assert_eq!(faults[0].name(), "flaky");
    assert!(faults[0].to_string().contains("bool"));

    // Drained
    assert!(runner.drain_faults().is_empty());
}

#[test]
fn test_every_unrecognized_kind_is_rejected() {
    let mut runner = Runner::new();
    runner.start("num", from_fn(|| Advance::Suspended(Yielded::Num(1.5))), 0);
    runner.start("str", from_fn(|| Advance::Suspended(Yielded::Str("s".into()))), 0);
    runner.start("bool", from_fn(|| Advance::Suspended(Yielded::Bool(false))), 0);

    runner.update();

    let kinds: Vec<&str> = runner
        .drain_faults()
        .iter()
        .map(|fault| match fault {
            CoroutineFault::InvalidYield { kind, .. } => *kind,
            other => unreachable!("Expected InvalidYield, got {:?}", other),
        })
        .collect();
    assert_eq!(kinds, vec!["num", "str", "bool"]);
    assert_eq!(runner.running_count(), 0);
}

#[test]
fn test_panicking_body_is_isolated() {
    let log = new_log();
    let mut runner = Runner::new();
    let before = runner.start("before", forever(&log, "before"), 0);
    let boom = runner.start("boom", from_fn(|| panic!("kaboom")), 0);
    let after = runner.start("after", forever(&log, "after"), 0);

    runner.update();

    assert_eq!(boom.status(), Some(Status::Stopped));
    assert!(before.is_running());
    assert!(after.is_running());
    assert_eq!(count_of(&log, "before"), 1);
    assert_eq!(count_of(&log, "after"), 1);

    let faults = runner.drain_faults();
    assert!(matches!(
        &faults[..],
        [CoroutineFault::Panicked { message, .. }] if message == "kaboom"
    ));
}

#[test]
#[should_panic(expected = "kaboom")]
fn test_panics_propagate_when_not_caught() {
    let config = RunnerConfig {
        catch_panics: false,
        ..RunnerConfig::default()
    };
    let mut runner = Runner::with_config(config);
    runner.start("boom", from_fn(|| panic!("kaboom")), 0);
    runner.update();
}

#[test]
fn test_recorded_faults_keep_only_the_most_recent() {
    let config = RunnerConfig {
        max_recorded_faults: 2,
        ..RunnerConfig::default()
    };
    let mut runner = Runner::with_config(config);
    runner.start("first", from_fn(|| Advance::Suspended(Yielded::Num(1.0))), 0);
    let second = runner.start("second", from_fn(|| Advance::Suspended(Yielded::Num(2.0))), 0);
    let third = runner.start("third", from_fn(|| Advance::Suspended(Yielded::Num(3.0))), 0);

    runner.update();

    let faults = runner.drain_faults();
    let ids: Vec<_> = faults.iter().map(CoroutineFault::id).collect();
    assert_eq!(ids, vec![second.id(), third.id()]);
    assert_eq!(runner.running_count(), 0);
}

#[test]
fn test_zero_fault_capacity_records_nothing() {
    let config = RunnerConfig {
        max_recorded_faults: 0,
        ..RunnerConfig::default()
    };
    let mut runner = Runner::with_config(config);
    let bad = runner.start("bad", from_fn(|| Advance::Suspended(Yielded::Bool(true))), 0);

    runner.update();

    assert_eq!(bad.status(), Some(Status::Stopped));
    assert!(runner.drain_faults().is_empty());
}
