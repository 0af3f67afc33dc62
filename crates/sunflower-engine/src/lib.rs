//! Sunflower engine crate.
//!
//! This crate owns the platform + GPU runtime pieces the scripting host drives:
//! the [`core::Backend`] contract, the winit/wgpu implementation of it, and the
//! logging setup shared by binaries.

pub mod core;
pub mod device;
pub mod window;

pub mod logging;
pub mod paint;
