//! Tests for the runner
//!
//! Organized by feature area

mod fault_tests;
mod handle_tests;
mod helpers;
