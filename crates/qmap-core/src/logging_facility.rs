//! Structured logging facility for qmap
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The engine layer owns operation boundaries (start/end/end_error events).
//! Core algorithms and stores only emit `tracing::debug!`/`warn!` details.
//!
//! ```rust
//! use qmap_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
