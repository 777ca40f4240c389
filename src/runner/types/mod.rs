//! Type definitions for the runner
//!
//! - Identity (CoroutineId)
//! - Lifecycle (Status)
//! - Nesting (FrameStack)
//! - Introspection (CoroutineInfo)

pub mod frame;
pub mod id;
pub mod info;
pub mod status;

pub use frame::FrameStack;
pub use id::CoroutineId;
pub use info::CoroutineInfo;
pub use status::Status;
