//! Host bootstrap.
//!
//! Runs the script once against a fresh [`HostState`], checks that it left a
//! window behind, then hands the state to the render loop.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use sunflower_engine::core::Backend;
use sunflower_engine::paint::ClearColor;
use sunflower_engine::window::{WindowConfig, WinitBackend};

use crate::config::HostConfig;
use crate::error::HostError;
use crate::pause;
use crate::render_loop;
use crate::script::ScriptEnv;

/// State shared by the script callbacks and the render loop.
pub struct HostState<B> {
    backend: B,
    clear_color: ClearColor,
}

impl<B: Backend> HostState<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clear_color: ClearColor::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clear_color(&self) -> ClearColor {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: ClearColor) {
        log::debug!("clear color set to {:?}", color.to_array());
        self.clear_color = color;
    }

    /// Creates the window and renderer, reporting success to the script.
    ///
    /// Sizes that do not fit a `u32` are treated as zero, which the backend
    /// rejects; either way the failure is logged and nothing is left behind.
    pub fn init_window(&mut self, title: &str, width: i64, height: i64) -> bool {
        let config = WindowConfig::new(
            title,
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        );

        match self.backend.create_window(&config) {
            Ok(()) => true,
            Err(err) => {
                log::error!("window could not be created: {err:#}");
                false
            }
        }
    }

    /// Drains events, clears and presents until a quit arrives.
    pub fn render(&mut self) -> Result<u64, HostError> {
        render_loop::run(&mut self.backend, self.clear_color)
    }
}

/// A host whose script has run successfully and left a window behind.
pub struct Session<B> {
    state: Rc<RefCell<HostState<B>>>,
    pause_on_crash: bool,
}

impl<B: Backend> Session<B> {
    pub fn pause_on_crash(&self) -> bool {
        self.pause_on_crash
    }

    /// Runs the render loop, then tears the backend down.
    pub fn run(self) -> Result<Shutdown, HostError> {
        let frames = self.state.borrow_mut().render()?;
        Ok(Shutdown {
            frames,
            pause_on_crash: self.pause_on_crash,
        })
    }
}

/// Outcome of a clean, quit-triggered shutdown.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Shutdown {
    /// Frames cleared and presented, including the one after the quit.
    pub frames: u64,
    pub pause_on_crash: bool,
}

/// Executes the script at `script_path` against `backend`.
///
/// Fails if the script cannot be read, raises an error, or returns without a
/// window and renderer having been created.
pub fn bootstrap<B>(backend: B, script_path: &Path) -> Result<Session<B>, HostError>
where
    B: Backend + 'static,
{
    let state = Rc::new(RefCell::new(HostState::new(backend)));

    let pause_on_crash = {
        let env = ScriptEnv::new(&state)?;
        env.exec_file(script_path)?;
        env.pause_on_crash()
    };

    if !state.borrow().backend().has_window() {
        return Err(HostError::NotInitialized);
    }

    Ok(Session {
        state,
        pause_on_crash,
    })
}

/// Bootstraps and renders with an already-initialized backend.
///
/// The backend is dropped (window, renderer, platform connection) before
/// this returns, on success and failure alike.
pub fn run_with_backend<B>(backend: B, script_path: &Path) -> Result<Shutdown, HostError>
where
    B: Backend + 'static,
{
    bootstrap(backend, script_path)?.run()
}

/// Full host lifecycle; returns the process exit status.
pub fn run(config: &HostConfig) -> i32 {
    let result = WinitBackend::new(config.gpu.clone())
        .map_err(HostError::Graphics)
        .and_then(|backend| run_with_backend(backend, &config.script_path));

    finish(result, io::stdin().lock(), io::stdout().lock())
}

/// Maps the run outcome to an exit status.
///
/// Only a clean shutdown with `pauseOnCrash` set prompts on `output` and
/// waits on `input`; failures exit without touching either.
pub fn finish<R, W>(result: Result<Shutdown, HostError>, input: R, output: W) -> i32
where
    R: BufRead,
    W: Write,
{
    match result {
        Ok(shutdown) => {
            log::info!("shut down after {} frames", shutdown.frames);
            if shutdown.pause_on_crash {
                if let Err(err) = pause::wait_for_acknowledgment(input, output) {
                    log::warn!("could not wait for acknowledgment: {err}");
                }
            }
            0
        }
        Err(err) => {
            log::error!("{err}");
            err.exit_code()
        }
    }
}
