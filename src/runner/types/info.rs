//! Read-only view of a coroutine instance

use serde::Serialize;

use super::{CoroutineId, Status};

/// Snapshot of one instance, as returned by `Runner::snapshot()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoroutineInfo {
    pub id: CoroutineId,
    pub name: String,
    pub status: Status,
    pub wait_ticks: u32,
    /// Number of frames on the instance's stack (0 once finished)
    pub depth: usize,
}
