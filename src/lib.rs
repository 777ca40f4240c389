//! # Cadence
//!
//! Cooperative, single-threaded coroutine runner driven by an external tick.
//!
//! ```
//! use cadence::resumable::{from_fn, Advance};
//! use cadence::Runner;
//!
//! let mut runner = Runner::new();
//! let mut n = 0;
//! let handle = runner.start("count", from_fn(move || {
//!     n += 1;
//!     if n < 3 { Advance::wait(0) } else { Advance::Completed }
//! }), 0);
//!
//! for _ in 0..3 {
//!     runner.update();
//! }
//! assert!(!handle.is_running());
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod resumable;
pub mod runner;

// Re-export main types
pub use config::RunnerConfig;
pub use errors::{AdmissionError, ConfigError, CoroutineFault};
pub use resumable::{Advance, Resumable, Yielded};
pub use runner::{CoroutineId, CoroutineInfo, Handle, Runner, Spawner, Status};
