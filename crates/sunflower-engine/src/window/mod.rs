//! Window + platform backend.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer.
//! Unlike a `run_app` runtime, the loop is pumped by the caller one
//! non-blocking iteration at a time.

mod runtime;

pub use runtime::{WindowConfig, WinitBackend};
