use anyhow::Result;

use crate::paint::ClearColor;
use crate::window::WindowConfig;

/// Platform event as seen by the host loop.
///
/// Only `Quit` carries meaning. Everything else (resize, focus, input) is
/// handled or ignored inside the backend and reported as `Other`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendEvent {
    Quit,
    Other,
}

/// Windowing + presentation contract implemented by platform layers.
pub trait Backend {
    /// Creates the window and its renderer.
    ///
    /// Any previously created window is destroyed first, so a failed call leaves
    /// the backend without a window.
    fn create_window(&mut self, config: &WindowConfig) -> Result<()>;

    /// Returns `true` once both the window and its renderer exist.
    fn has_window(&self) -> bool;

    /// Drains every pending platform event without blocking.
    fn drain_events(&mut self) -> Vec<BackendEvent>;

    /// Clears the drawing surface to `color`.
    fn clear(&mut self, color: ClearColor) -> Result<()>;

    /// Presents the frame recorded since the last `clear`.
    fn present(&mut self) -> Result<()>;
}
