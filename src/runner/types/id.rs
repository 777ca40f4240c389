//! Coroutine identity

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared by every runner in the process; 0 is reserved for detached handles
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a coroutine instance
///
/// Identities come from one process-wide counter in strictly increasing
/// order and are never reused, so ordering by id is creation order and an
/// id never names instances of two different runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CoroutineId(u64);

impl CoroutineId {
    pub fn from_raw(raw: u64) -> Self {
        CoroutineId(raw)
    }

    /// Allocate the next unused identity
    pub(crate) fn next() -> Self {
        CoroutineId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CoroutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "co-{}", self.0)
    }
}
