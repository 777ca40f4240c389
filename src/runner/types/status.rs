//! Coroutine lifecycle states

use serde::Serialize;
use std::fmt;

/// Lifecycle state of a coroutine instance
///
/// `Running` is the only initial state. `Completed` and `Stopped` are
/// terminal: nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Stopped,
    Completed,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Running => "running",
            Status::Stopped => "stopped",
            Status::Completed => "completed",
        };
        f.write_str(s)
    }
}
