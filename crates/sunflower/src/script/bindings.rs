use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Lua, Value};

use sunflower_engine::core::Backend;
use sunflower_engine::paint::ClearColor;

use crate::host::HostState;

/// Global table holding every host entry point.
pub const NAMESPACE: &str = "sunflower";

/// Field of `sunflower.debugger` read back after the script returns.
pub const PAUSE_ON_CRASH: &str = "pauseOnCrash";

/// Registers `sunflower.init`, `sunflower.graphics.color` and
/// `sunflower.debugger.pauseOnCrash`.
pub(super) fn register<B>(lua: &Lua, state: &Rc<RefCell<HostState<B>>>) -> mlua::Result<()>
where
    B: Backend + 'static,
{
    let namespace = lua.create_table()?;

    let st = Rc::clone(state);
    let init = lua.create_function(
        move |_, (title, width, height): (mlua::String, Value, Value)| {
            let width = integer_arg(width, 2, "init")?;
            let height = integer_arg(height, 3, "init")?;
            Ok(st.borrow_mut().init_window(&title.to_string_lossy(), width, height))
        },
    )?;
    namespace.set("init", init)?;

    let graphics = lua.create_table()?;
    let st = Rc::clone(state);
    let color = lua.create_function(move |_, (r, g, b, a): (Value, Value, Value, Value)| {
        let color = ClearColor::from_low_bytes(
            integer_arg(r, 1, "color")?,
            integer_arg(g, 2, "color")?,
            integer_arg(b, 3, "color")?,
            integer_arg(a, 4, "color")?,
        );
        st.borrow_mut().set_clear_color(color);
        Ok(())
    })?;
    graphics.set("color", color)?;
    namespace.set("graphics", graphics)?;

    let debugger = lua.create_table()?;
    debugger.set(PAUSE_ON_CRASH, false)?;
    namespace.set("debugger", debugger)?;

    lua.globals().set(NAMESPACE, namespace)
}

/// Converts argument `pos` of `func` to an integer.
///
/// Floats are accepted only when they hold an exact integer; anything with a
/// fractional part, or outside the `i64` range, raises instead of truncating.
fn integer_arg(value: Value, pos: usize, func: &str) -> mlua::Result<i64> {
    match value {
        Value::Integer(i) => Ok(i),
        Value::Number(n) if n.fract() == 0.0 && n >= -(2f64.powi(63)) && n < 2f64.powi(63) => {
            Ok(n as i64)
        }
        Value::Number(n) => Err(mlua::Error::runtime(format!(
            "bad argument #{pos} to '{func}' (number {n} has no integer representation)"
        ))),
        other => Err(mlua::Error::runtime(format!(
            "bad argument #{pos} to '{func}' (integer expected, got {})",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockBackend};
    use sunflower_engine::window::WindowConfig;

    fn setup(backend: MockBackend) -> (Lua, Rc<RefCell<HostState<MockBackend>>>) {
        let lua = Lua::new();
        let state = Rc::new(RefCell::new(HostState::new(backend)));
        register(&lua, &state).unwrap();
        (lua, state)
    }

    #[test]
    fn init_creates_window_and_returns_true() {
        let (backend, calls) = MockBackend::new();
        let (lua, state) = setup(backend);

        let ok: bool = lua.load(r#"return sunflower.init("hello", 800, 600)"#).eval().unwrap();

        assert!(ok);
        assert!(state.borrow().backend().has_window());
        assert_eq!(
            calls.borrow().as_slice(),
            &[Call::CreateWindow(WindowConfig::new("hello", 800, 600))]
        );
    }

    #[test]
    fn init_returns_false_when_backend_fails() {
        let (backend, _) = MockBackend::new();
        let (lua, state) = setup(backend.failing_window());

        let ok: bool = lua.load(r#"return sunflower.init("x", 640, 480)"#).eval().unwrap();

        assert!(!ok);
        assert!(!state.borrow().backend().has_window());
    }

    #[test]
    fn init_rejects_negative_size_without_raising() {
        let (backend, _) = MockBackend::new();
        let (lua, state) = setup(backend);

        let ok: bool = lua.load(r#"return sunflower.init("x", -1, 480)"#).eval().unwrap();

        assert!(!ok);
        assert!(!state.borrow().backend().has_window());
    }

    #[test]
    fn second_init_replaces_window() {
        let (backend, calls) = MockBackend::new();
        let (lua, state) = setup(backend);

        lua.load(r#"sunflower.init("a", 10, 10) sunflower.init("b", 20, 20)"#)
            .exec()
            .unwrap();

        assert!(state.borrow().backend().has_window());
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(calls.borrow()[1], Call::CreateWindow(WindowConfig::new("b", 20, 20)));
    }

    #[test]
    fn color_overwrites_state_immediately() {
        let (backend, _) = MockBackend::new();
        let (lua, state) = setup(backend);

        lua.load("sunflower.graphics.color(1, 2, 3, 4)").exec().unwrap();
        assert_eq!(state.borrow().clear_color(), ClearColor::new(1, 2, 3, 4));

        lua.load("sunflower.graphics.color(9, 8, 7, 6)").exec().unwrap();
        assert_eq!(state.borrow().clear_color(), ClearColor::new(9, 8, 7, 6));
    }

    #[test]
    fn color_keeps_low_byte_of_out_of_range_values() {
        let (backend, _) = MockBackend::new();
        let (lua, state) = setup(backend);

        lua.load("sunflower.graphics.color(256, -1, 300, 0)").exec().unwrap();

        assert_eq!(state.borrow().clear_color(), ClearColor::new(0, 255, 44, 0));
    }

    #[test]
    fn color_with_missing_channel_raises() {
        let (backend, _) = MockBackend::new();
        let (lua, _state) = setup(backend);

        assert!(lua.load("sunflower.graphics.color(1, 2, 3)").exec().is_err());
    }

    #[test]
    fn init_with_fractional_size_raises() {
        let (backend, calls) = MockBackend::new();
        let (lua, state) = setup(backend);

        let err = lua.load(r#"sunflower.init("x", 10.5, 10)"#).exec().unwrap_err();

        assert!(err.to_string().contains("no integer representation"), "{err}");
        assert!(!state.borrow().backend().has_window());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn init_accepts_integral_floats() {
        let (backend, calls) = MockBackend::new();
        let (lua, _state) = setup(backend);

        let ok: bool = lua.load(r#"return sunflower.init("x", 10.0, 2^4)"#).eval().unwrap();

        assert!(ok);
        assert_eq!(
            calls.borrow().as_slice(),
            &[Call::CreateWindow(WindowConfig::new("x", 10, 16))]
        );
    }

    #[test]
    fn init_with_non_numeric_size_raises() {
        let (backend, _) = MockBackend::new();
        let (lua, _state) = setup(backend);

        assert!(lua.load(r#"sunflower.init("x", {}, 10)"#).exec().is_err());
    }

    #[test]
    fn init_replaces_invalid_utf8_in_title() {
        let (backend, calls) = MockBackend::new();
        let (lua, _state) = setup(backend);

        let ok: bool = lua.load(r#"return sunflower.init("caf\xe9", 10, 10)"#).eval().unwrap();

        assert!(ok);
        assert_eq!(
            calls.borrow().as_slice(),
            &[Call::CreateWindow(WindowConfig::new("caf\u{fffd}", 10, 10))]
        );
    }

    #[test]
    fn color_with_fractional_channel_raises() {
        let (backend, _) = MockBackend::new();
        let (lua, state) = setup(backend);

        let err = lua.load("sunflower.graphics.color(1.5, 0, 0, 0)").exec().unwrap_err();

        assert!(err.to_string().contains("bad argument #1 to 'color'"), "{err}");
        assert_eq!(state.borrow().clear_color(), ClearColor::WHITE);
    }

    #[test]
    fn pause_on_crash_starts_false() {
        let (backend, _) = MockBackend::new();
        let (lua, _state) = setup(backend);

        let v: bool = lua.load("return sunflower.debugger.pauseOnCrash").eval().unwrap();
        assert!(!v);
    }
}
