//! Structured logging facility for rowpatch
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The engine layer owns lifecycle logging for batch execution and preview;
//! the session store and SQL synthesis only emit `tracing::debug!` details.
//!
//! # Usage
//!
//! ```rust
//! use rowpatch_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CaptureLayer, CapturedEvent, TestCapture};
