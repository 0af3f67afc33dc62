//! Sunflower host crate.
//!
//! Bootstraps a Lua environment, lets the script create a window and pick a
//! clear color through the `sunflower` namespace, then repaints that color
//! every frame until the platform asks to quit.

pub mod config;
pub mod error;
pub mod host;
pub mod pause;
pub mod render_loop;
pub mod script;

#[cfg(test)]
mod testing;

pub use config::HostConfig;
pub use error::HostError;
pub use host::{bootstrap, run, run_with_backend, HostState, Session, Shutdown};
