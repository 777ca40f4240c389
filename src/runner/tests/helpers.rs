//! Test helpers for runner tests
//!
//! Bodies here record every step they take into a shared log so tests can
//! assert exactly which tick advanced what.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::resumable::{from_fn, Advance, Resumable};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Body that logs "{label}:{n}" for n in 1..=count, yielding `wait` between
/// entries and completing right after the last one
pub fn counter(log: &Log, label: &str, count: u32, wait: i64) -> impl Resumable {
    let log = log.clone();
    let label = label.to_string();
    let mut n = 0;
    from_fn(move || {
        n += 1;
        log.borrow_mut().push(format!("{label}:{n}"));
        if n < count {
            Advance::wait(wait)
        } else {
            Advance::Completed
        }
    })
}

/// Body that logs "{label}:{i}" on step i and then returns the i-th
/// scripted outcome; completes once the script runs out
pub fn scripted(log: &Log, label: &str, script: Vec<Advance>) -> impl Resumable {
    let log = log.clone();
    let label = label.to_string();
    let mut script: VecDeque<Advance> = script.into();
    let mut step = 0;
    from_fn(move || {
        log.borrow_mut().push(format!("{label}:{step}"));
        step += 1;
        script.pop_front().unwrap_or(Advance::Completed)
    })
}

/// Body that yields `Null` forever, logging "{label}" each step
pub fn forever(log: &Log, label: &str) -> impl Resumable {
    let log = log.clone();
    let label = label.to_string();
    from_fn(move || {
        log.borrow_mut().push(label.clone());
        Advance::next_tick()
    })
}

/// Count of log lines equal to `label`
pub fn count_of(log: &Log, label: &str) -> usize {
    log.borrow().iter().filter(|line| *line == label).count()
}
