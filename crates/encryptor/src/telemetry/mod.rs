//! Tracing subscriber setup for the `encryptor` binary.
//!
//! # Telemetry invariants
//!
//! - **No payment values or key material** may appear in any log field.
//! - Logs go to stderr; stdout carries only the envelope.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init;
