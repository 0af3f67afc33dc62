use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::core::{Backend, BackendEvent};
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::paint::ClearColor;

/// Parameters of one window creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("sunflower", 1280, 720)
    }
}

/// winit + wgpu implementation of [`Backend`].
///
/// Field order is drop order: the in-flight frame goes first, then the
/// renderer and window, and the event loop (the platform connection) last.
pub struct WinitBackend {
    frame: Option<GpuFrame>,
    skipped: SkipStreak,
    entry: Option<WindowEntry>,
    handler: PumpState,
    gpu_init: GpuInit,
    event_loop: EventLoop<()>,
}

impl WinitBackend {
    /// Connects to the platform windowing system.
    pub fn new(gpu_init: GpuInit) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        Ok(Self {
            frame: None,
            skipped: SkipStreak::default(),
            entry: None,
            handler: PumpState::default(),
            gpu_init,
            event_loop,
        })
    }

    /// Runs one non-blocking iteration of the platform loop.
    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with status {code}");
            self.handler.events.push(Queued {
                window: None,
                event: PlatformEvent::Quit,
            });
        }
    }

    fn current_window_id(&self) -> Option<WindowId> {
        self.entry.as_ref().map(|e| e.with_window(|w| w.id()))
    }

    fn destroy_window(&mut self) {
        self.frame = None;
        self.skipped = SkipStreak::default();
        if self.entry.take().is_some() {
            log::debug!("previous window destroyed");
        }
    }
}

impl Backend for WinitBackend {
    fn create_window(&mut self, config: &WindowConfig) -> Result<()> {
        self.destroy_window();
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "invalid window size {}x{}",
            config.width,
            config.height
        );

        self.handler.pending_window = Some(config.clone());
        self.pump();
        self.handler.pending_window = None;

        let window = self
            .handler
            .created_window
            .take()
            .context("event loop did not service the window request")??;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("failed to create renderer")?;

        log::info!(
            "window \"{}\" created ({}x{})",
            config.title,
            config.width,
            config.height
        );
        self.entry = Some(entry);
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.entry.is_some()
    }

    fn drain_events(&mut self) -> Vec<BackendEvent> {
        self.pump();

        let current = self.current_window_id();
        let mut out = Vec::with_capacity(self.handler.events.len());

        for Queued { window, event } in self.handler.events.drain(..) {
            // Events addressed to a window that has since been replaced mean nothing.
            if window.is_some() && window != current {
                out.push(BackendEvent::Other);
                continue;
            }

            match event {
                PlatformEvent::Quit => out.push(BackendEvent::Quit),
                PlatformEvent::Resized(size) => {
                    if let Some(entry) = self.entry.as_mut() {
                        entry.with_gpu_mut(|gpu| gpu.resize(size));
                    }
                    out.push(BackendEvent::Other);
                }
                PlatformEvent::ScaleFactorChanged => {
                    if let Some(entry) = self.entry.as_mut() {
                        let size = entry.with_window(|w| w.inner_size());
                        entry.with_gpu_mut(|gpu| gpu.resize(size));
                    }
                    out.push(BackendEvent::Other);
                }
                PlatformEvent::Other => out.push(BackendEvent::Other),
            }
        }

        out
    }

    fn clear(&mut self, color: ClearColor) -> Result<()> {
        let (entry, frame_slot, skipped) =
            (self.entry.as_mut(), &mut self.frame, &mut self.skipped);
        let entry = entry.context("clear called without a window")?;

        entry.with_gpu_mut(|gpu| {
            if frame_slot.is_none() {
                match gpu.begin_frame() {
                    Ok(frame) => {
                        let run = skipped.end();
                        if run > 0 {
                            log::debug!("rendering resumed after {run} skipped frames");
                        }
                        *frame_slot = Some(frame);
                    }
                    Err(err) => {
                        let action = gpu.handle_surface_error(err);
                        anyhow::ensure!(
                            action != SurfaceErrorAction::Fatal,
                            "surface ran out of memory"
                        );
                        if skipped.skip() {
                            log::warn!("frame skipped: surface {action:?}");
                        } else {
                            log::trace!("frame skipped: surface {action:?}");
                        }
                        return Ok(());
                    }
                }
            }

            if let Some(frame) = frame_slot.as_mut() {
                let srgb = gpu.surface_format().is_srgb();
                gpu.clear(frame, color.to_wgpu(srgb));
            }
            Ok(())
        })
    }

    fn present(&mut self) -> Result<()> {
        let entry = self.entry.as_ref().context("present called without a window")?;

        // No frame means `clear` skipped it after a transient surface error.
        let Some(frame) = self.frame.take() else {
            return Ok(());
        };

        entry.with_window(|w| w.pre_present_notify());
        entry.with_gpu(|gpu| gpu.submit(frame));
        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Platform events the backend cares about, before window filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PlatformEvent {
    Quit,
    Resized(PhysicalSize<u32>),
    ScaleFactorChanged,
    Other,
}

impl PlatformEvent {
    fn from_window_event(event: &WindowEvent) -> Self {
        match event {
            WindowEvent::CloseRequested => Self::Quit,
            WindowEvent::Resized(size) => Self::Resized(*size),
            WindowEvent::ScaleFactorChanged { .. } => Self::ScaleFactorChanged,
            _ => Self::Other,
        }
    }
}

/// Consecutive frames skipped on transient surface errors.
///
/// A minimized window skips every frame, so only the first skip of a run is
/// reported above trace level.
#[derive(Debug, Default)]
struct SkipStreak {
    frames: u64,
}

impl SkipStreak {
    /// Records a skipped frame. Returns true if it starts a new run.
    fn skip(&mut self) -> bool {
        self.frames += 1;
        self.frames == 1
    }

    /// Ends the current run and returns its length.
    fn end(&mut self) -> u64 {
        std::mem::take(&mut self.frames)
    }
}

struct Queued {
    /// `None` for loop-level events not tied to a window.
    window: Option<WindowId>,
    event: PlatformEvent,
}

/// Handler fed to `pump_app_events`.
///
/// Window creation needs an `ActiveEventLoop`, so requests are parked here and
/// serviced on the next pump.
#[derive(Default)]
struct PumpState {
    pending_window: Option<WindowConfig>,
    created_window: Option<Result<Window>>,
    events: Vec<Queued>,
}

impl ApplicationHandler for PumpState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        self.events.push(Queued {
            window: Some(window_id),
            event: PlatformEvent::from_window_event(&event),
        });
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(config) = self.pending_window.take() {
            let attrs = Window::default_attributes()
                .with_title(config.title)
                .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
                .with_resizable(true);

            self.created_window = Some(
                event_loop
                    .create_window(attrs)
                    .context("failed to create window"),
            );
        }
    }
}
