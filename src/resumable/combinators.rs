//! Ready-made computations
//!
//! Small building blocks for writing coroutine bodies without hand-rolling
//! a state machine for every wait or delegation.

use std::collections::VecDeque;

use super::{Advance, Resumable, Yielded};
use crate::runner::Handle;

/* ===================== from_fn ===================== */

/// Computation backed by a step closure
///
/// The closure is called once per step and owns whatever state it captures.
pub struct FromFn<F> {
    step: F,
}

/// Turn a closure into a [`Resumable`].
///
/// ```
/// use cadence::resumable::{from_fn, Advance};
///
/// let mut n = 0;
/// let counter = from_fn(move || {
///     n += 1;
///     if n < 3 { Advance::next_tick() } else { Advance::Completed }
/// });
/// # drop(counter);
/// ```
pub fn from_fn<F>(step: F) -> FromFn<F>
where
    F: FnMut() -> Advance,
{
    FromFn { step }
}

impl<F> Resumable for FromFn<F>
where
    F: FnMut() -> Advance,
{
    fn advance(&mut self) -> Advance {
        (self.step)()
    }
}

/* ===================== wait_ticks ===================== */

/// Computation that waits a fixed number of ticks, then completes
#[derive(Debug, Clone)]
pub struct WaitTicks {
    ticks: i64,
    yielded: bool,
}

/// Yield `Int(ticks)` once, then complete on the following step.
pub fn wait_ticks(ticks: i64) -> WaitTicks {
    WaitTicks {
        ticks,
        yielded: false,
    }
}

impl Resumable for WaitTicks {
    fn advance(&mut self) -> Advance {
        if self.yielded {
            return Advance::Completed;
        }
        self.yielded = true;
        Advance::wait(self.ticks)
    }
}

/* ===================== sequence ===================== */

/// Computation that delegates to each child in turn
pub struct Sequence {
    children: VecDeque<Box<dyn Resumable>>,
}

/// Run `children` one after another as nested frames.
pub fn sequence<I>(children: I) -> Sequence
where
    I: IntoIterator<Item = Box<dyn Resumable>>,
{
    Sequence {
        children: children.into_iter().collect(),
    }
}

impl Resumable for Sequence {
    fn advance(&mut self) -> Advance {
        match self.children.pop_front() {
            Some(child) => Advance::Suspended(Yielded::Coroutine(child)),
            None => Advance::Completed,
        }
    }
}

/* ===================== wait_for ===================== */

/// Computation that waits for another coroutine to stop running
#[derive(Debug, Clone)]
pub struct WaitFor {
    target: Handle,
}

/// Yield `Null` every tick while `target` is running.
///
/// Safe to use after the target has been reaped: a dead handle simply
/// reports "not running" and the wait ends.
pub fn wait_for(target: Handle) -> WaitFor {
    WaitFor { target }
}

impl Resumable for WaitFor {
    fn advance(&mut self) -> Advance {
        if self.target.is_running() {
            Advance::next_tick()
        } else {
            Advance::Completed
        }
    }
}
