//! Spin-poll-present loop.
//!
//! There is no frame pacing here; FIFO presentation in the backend is the
//! only thing that may slow the loop down.

use sunflower_engine::core::{Backend, BackendEvent};
use sunflower_engine::paint::ClearColor;

use crate::error::HostError;

/// Repaints `color` every iteration until a quit event is drained.
///
/// The iteration that drains the quit still clears and presents. Returns the
/// number of frames presented.
pub fn run<B: Backend>(backend: &mut B, color: ClearColor) -> Result<u64, HostError> {
    let mut running = true;
    let mut frames: u64 = 0;

    while running {
        for event in backend.drain_events() {
            if event == BackendEvent::Quit {
                running = false;
            }
        }

        backend.clear(color).map_err(HostError::Render)?;
        backend.present().map_err(HostError::Render)?;
        frames += 1;
    }

    log::info!("quit received");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockBackend};
    use sunflower_engine::window::WindowConfig;

    fn ready(backend: MockBackend) -> MockBackend {
        let mut backend = backend;
        backend.create_window(&WindowConfig::default()).unwrap();
        backend
    }

    #[test]
    fn quit_on_first_poll_still_renders_once() {
        let (backend, calls) = MockBackend::new();
        let mut backend = ready(backend.with_polls(vec![vec![BackendEvent::Quit]]));

        let frames = run(&mut backend, ClearColor::new(1, 2, 3, 4)).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(
            &calls.borrow()[1..],
            &[Call::Clear(ClearColor::new(1, 2, 3, 4)), Call::Present]
        );
    }

    #[test]
    fn clear_always_precedes_present() {
        let (backend, calls) = MockBackend::new();
        let mut backend = ready(backend.with_polls(vec![vec![], vec![], vec![BackendEvent::Quit]]));

        run(&mut backend, ClearColor::WHITE).unwrap();

        let rendered: Vec<Call> = calls.borrow()[1..].to_vec();
        for pair in rendered.chunks(2) {
            assert_eq!(pair, &[Call::Clear(ClearColor::WHITE), Call::Present]);
        }
        assert_eq!(rendered.len(), 6);
    }

    #[test]
    fn non_quit_events_are_ignored() {
        let (backend, _) = MockBackend::new();
        let polls = vec![vec![BackendEvent::Other; 5], vec![BackendEvent::Other], vec![BackendEvent::Quit]];
        let mut backend = ready(backend.with_polls(polls));

        assert_eq!(run(&mut backend, ClearColor::WHITE).unwrap(), 3);
    }

    #[test]
    fn present_failure_stops_the_loop() {
        let (backend, calls) = MockBackend::new();
        let mut backend = ready(backend.failing_present());

        let err = run(&mut backend, ClearColor::WHITE).unwrap_err();

        assert!(matches!(err, HostError::Render(_)));
        assert!(!calls.borrow().contains(&Call::Present));
    }
}
