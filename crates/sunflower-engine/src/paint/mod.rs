//! Paint model shared between the host and the backend.
//!
//! The host only ever paints one solid color per frame, so the model is a
//! single byte-RGBA value type.

pub mod color;

pub use color::ClearColor;
