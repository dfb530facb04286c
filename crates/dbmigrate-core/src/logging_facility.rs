//! Structured logging facility for dbmigrate
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) owned
//!   by the engine layer; store code only emits `tracing::debug!`
//! - Test capture mode for asserting on emitted events
//!
//! # Usage
//!
//! ```rust
//! use dbmigrate_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
