//! Resumable computations
//!
//! A coroutine body is anything implementing [`Resumable`]: an object that,
//! each time it is advanced, runs until it either finishes or suspends with
//! a [`Yielded`] value. The runner never looks inside a body; it only
//! interprets what comes out of `advance()`.
//!
//! ## Yield contract
//!
//! | Yielded                  | Meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `Null`                   | resume on the next tick                   |
//! | `Int(n)`                 | skip `n` ticks, then resume (`n <= 0` = next tick) |
//! | `Coroutine(child)`       | run `child` to completion, then resume    |
//! | anything else            | contract violation, the coroutine is stopped |

pub mod combinators;

use std::fmt;

pub use combinators::{
    from_fn, sequence, wait_for, wait_ticks, FromFn, Sequence, WaitFor, WaitTicks,
};

/* ===================== Capability ===================== */

/// A unit of suspendable logic that the runner steps once per tick.
pub trait Resumable {
    /// Run until the next suspension point or until completion.
    fn advance(&mut self) -> Advance;
}

impl<R: Resumable + ?Sized> Resumable for Box<R> {
    fn advance(&mut self) -> Advance {
        (**self).advance()
    }
}

/// Outcome of a single `advance()` call
#[derive(Debug)]
pub enum Advance {
    /// The computation has finished and must not be advanced again
    Completed,
    /// The computation paused and handed a value to the scheduler
    Suspended(Yielded),
}

impl Advance {
    /// Suspend until the next tick.
    pub fn next_tick() -> Self {
        Advance::Suspended(Yielded::Null)
    }

    /// Suspend for `ticks` ticks.
    pub fn wait(ticks: i64) -> Self {
        Advance::Suspended(Yielded::Int(ticks))
    }

    /// Suspend until `child` has run to completion.
    pub fn delegate<R: Resumable + 'static>(child: R) -> Self {
        Advance::Suspended(Yielded::Coroutine(Box::new(child)))
    }
}

/* ===================== Yield Values ===================== */

/// Value produced by a computation at a suspension point
///
/// Mirrors the loosely typed values a scripting host would hand back, so
/// that bodies can yield things the scheduler does not understand.
pub enum Yielded {
    Null,
    Int(i64),
    Num(f64),
    Bool(bool),
    Str(String),
    Coroutine(Box<dyn Resumable>),
}

impl Yielded {
    /// Short type name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Yielded::Null => "null",
            Yielded::Int(_) => "int",
            Yielded::Num(_) => "num",
            Yielded::Bool(_) => "bool",
            Yielded::Str(_) => "str",
            Yielded::Coroutine(_) => "coroutine",
        }
    }
}

impl fmt::Debug for Yielded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Yielded::Null => f.write_str("Null"),
            Yielded::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Yielded::Num(n) => f.debug_tuple("Num").field(n).finish(),
            Yielded::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Yielded::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Yielded::Coroutine(_) => f.write_str("Coroutine(..)"),
        }
    }
}

impl From<i64> for Yielded {
    fn from(ticks: i64) -> Self {
        Yielded::Int(ticks)
    }
}

impl From<()> for Yielded {
    fn from(_: ()) -> Self {
        Yielded::Null
    }
}

impl From<Box<dyn Resumable>> for Yielded {
    fn from(child: Box<dyn Resumable>) -> Self {
        Yielded::Coroutine(child)
    }
}
