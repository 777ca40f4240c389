//! Frame stack resolution
//!
//! This module contains step() - advancing one coroutine instance by one
//! logical step. It touches only the instance's frame stack; the runner
//! applies the returned [`Step`] to the instance's scheduling state.
//!
//! Ordering rules enforced here:
//! - A pushed child is never advanced in the step that pushed it
//! - A completed frame is popped, but its parent is not advanced until the
//!   next step

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::resumable::{Advance, Yielded};

use super::types::FrameStack;

/* ===================== Step Result ===================== */

/// What a single step did to the frame stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Active frame suspended; skip this many ticks before the next step
    Wait(u32),
    /// Active frame yielded a child, which is now on top
    Delegated,
    /// Active frame completed and was popped; its parent is now on top
    Returned,
    /// Last frame completed, the stack is empty
    Done,
    /// The instance can not continue
    Fault(Fault),
}

/// Reason a step could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    InvalidYield(&'static str),
    Panicked(String),
    DepthExceeded(usize),
}

/// Per-step limits taken from the runner configuration
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub catch_panics: bool,
    pub max_frame_depth: Option<usize>,
}

/* ===================== Public API ===================== */

/// Advance the active frame once and resolve what it yielded
pub fn step(stack: &mut FrameStack, limits: Limits) -> Step {
    let Some(frame) = stack.top_mut() else {
        // Nothing left to run
        return Step::Done;
    };

    let advance = if limits.catch_panics {
        match panic::catch_unwind(AssertUnwindSafe(|| frame.advance())) {
            Ok(advance) => advance,
            Err(payload) => return Step::Fault(Fault::Panicked(panic_message(payload.as_ref()))),
        }
    } else {
        frame.advance()
    };

    match advance {
        Advance::Completed => {
            stack.pop();
            if stack.is_empty() {
                Step::Done
            } else {
                Step::Returned
            }
        }

        Advance::Suspended(Yielded::Null) => Step::Wait(0),

        Advance::Suspended(Yielded::Int(ticks)) => Step::Wait(clamp_ticks(ticks)),

        Advance::Suspended(Yielded::Coroutine(child)) => {
            if let Some(limit) = limits.max_frame_depth {
                if stack.depth() >= limit {
                    return Step::Fault(Fault::DepthExceeded(limit));
                }
            }
            stack.push(child);
            Step::Delegated
        }

        Advance::Suspended(other) => Step::Fault(Fault::InvalidYield(other.kind())),
    }
}

/* ===================== Helpers ===================== */

/// Negative counts mean "next tick"
fn clamp_ticks(ticks: i64) -> u32 {
    u32::try_from(ticks.max(0)).unwrap_or(u32::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
