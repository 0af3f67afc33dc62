//! Logging utilities.
//!
//! Centralizes logger initialization on top of the standard `log` facade.
//! Output goes to stderr, which is also where fatal host errors are reported.

mod init;

pub use init::{init_logging, LoggingConfig};
