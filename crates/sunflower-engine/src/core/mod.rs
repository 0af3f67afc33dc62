//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the platform backend and
//! the host that drives it. The host never sees winit or wgpu types; it only
//! creates a window, drains [`BackendEvent`]s and clears/presents frames.

mod backend;

pub use backend::{Backend, BackendEvent};
