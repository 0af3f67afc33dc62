//! Test doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Result, bail};
use tempfile::NamedTempFile;

use sunflower_engine::core::{Backend, BackendEvent};
use sunflower_engine::paint::ClearColor;
use sunflower_engine::window::WindowConfig;

/// Backend call as observed by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateWindow(WindowConfig),
    Clear(ClearColor),
    Present,
}

/// Recording backend.
///
/// Each `drain_events` pops one scripted batch; once the script runs out it
/// reports `Quit` so loops always terminate.
pub struct MockBackend {
    calls: Rc<RefCell<Vec<Call>>>,
    polls: VecDeque<Vec<BackendEvent>>,
    fail_window: bool,
    fail_present: bool,
    window: bool,
    dropped: Rc<Cell<bool>>,
}

impl MockBackend {
    pub fn new() -> (Self, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let backend = Self {
            calls: Rc::clone(&calls),
            polls: VecDeque::new(),
            fail_window: false,
            fail_present: false,
            window: false,
            dropped: Rc::new(Cell::new(false)),
        };
        (backend, calls)
    }

    pub fn with_polls(mut self, polls: Vec<Vec<BackendEvent>>) -> Self {
        self.polls = polls.into();
        self
    }

    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn failing_present(mut self) -> Self {
        self.fail_present = true;
        self
    }

    /// Flag set when the backend is dropped.
    pub fn drop_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.dropped)
    }
}

impl Backend for MockBackend {
    fn create_window(&mut self, config: &WindowConfig) -> Result<()> {
        self.window = false;
        if self.fail_window {
            bail!("simulated window failure");
        }
        if config.width == 0 || config.height == 0 {
            bail!("invalid window size {}x{}", config.width, config.height);
        }

        self.calls.borrow_mut().push(Call::CreateWindow(config.clone()));
        self.window = true;
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.window
    }

    fn drain_events(&mut self) -> Vec<BackendEvent> {
        self.polls.pop_front().unwrap_or_else(|| vec![BackendEvent::Quit])
    }

    fn clear(&mut self, color: ClearColor) -> Result<()> {
        assert!(self.window, "clear without a window");
        self.calls.borrow_mut().push(Call::Clear(color));
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.fail_present {
            bail!("simulated surface loss");
        }
        self.calls.borrow_mut().push(Call::Present);
        Ok(())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

/// Writes `source` to a temporary `.lua` file.
pub fn script_file(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".lua")
        .tempfile()
        .unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
