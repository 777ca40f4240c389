//! Error types
//!
//! Faults are scoped to a single coroutine: the runner records them, stops
//! the offending instance, and keeps stepping everything else.

use thiserror::Error;

use crate::runner::CoroutineId;

/* ===================== Error Codes ===================== */

pub const INVALID_YIELD: &str = "InvalidYield";
pub const PANICKED: &str = "Panicked";
pub const DEPTH_EXCEEDED: &str = "DepthExceeded";

/* ===================== Coroutine Faults ===================== */

/// A fault that forced one coroutine into `Stopped`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoroutineFault {
    #[error("coroutine '{name}' ({id}) yielded an unsupported {kind} value")]
    InvalidYield {
        id: CoroutineId,
        name: String,
        kind: &'static str,
    },

    #[error("coroutine '{name}' ({id}) panicked: {message}")]
    Panicked {
        id: CoroutineId,
        name: String,
        message: String,
    },

    #[error("coroutine '{name}' ({id}) nested deeper than {limit} frames")]
    DepthExceeded {
        id: CoroutineId,
        name: String,
        limit: usize,
    },
}

impl CoroutineFault {
    pub fn id(&self) -> CoroutineId {
        match self {
            CoroutineFault::InvalidYield { id, .. }
            | CoroutineFault::Panicked { id, .. }
            | CoroutineFault::DepthExceeded { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CoroutineFault::InvalidYield { name, .. }
            | CoroutineFault::Panicked { name, .. }
            | CoroutineFault::DepthExceeded { name, .. } => name,
        }
    }

    /// Stable error code for matching without parsing messages
    pub fn code(&self) -> &'static str {
        match self {
            CoroutineFault::InvalidYield { .. } => INVALID_YIELD,
            CoroutineFault::Panicked { .. } => PANICKED,
            CoroutineFault::DepthExceeded { .. } => DEPTH_EXCEEDED,
        }
    }
}

/* ===================== Admission ===================== */

/// Why `try_start` refused to create a coroutine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("runner is at capacity ({limit} coroutines)")]
    CapacityExceeded { limit: usize },

    #[error("a coroutine named '{0}' is already running")]
    DuplicateName(String),

    #[error("runner has been dropped")]
    RunnerDropped,
}

/* ===================== Configuration ===================== */

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
