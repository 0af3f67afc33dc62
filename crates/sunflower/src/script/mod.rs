//! Lua scripting environment.
//!
//! Scripts see the base, package, string and table libraries plus the
//! `sunflower` namespace; nothing that touches the OS or raw I/O.

mod bindings;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::{Lua, LuaOptions, StdLib, Table, Value};

use sunflower_engine::core::Backend;

use crate::error::HostError;
use crate::host::HostState;

pub use bindings::{NAMESPACE, PAUSE_ON_CRASH};

/// Libraries opened in addition to the always-present base library.
fn script_libs() -> StdLib {
    StdLib::PACKAGE | StdLib::STRING | StdLib::TABLE
}

/// A Lua state with the host namespace registered.
pub struct ScriptEnv {
    lua: Lua,
}

impl ScriptEnv {
    /// Creates the restricted Lua state and registers the `sunflower` table,
    /// whose callbacks act on `state`.
    pub fn new<B>(state: &Rc<RefCell<HostState<B>>>) -> mlua::Result<Self>
    where
        B: Backend + 'static,
    {
        let lua = Lua::new_with(script_libs(), LuaOptions::default())?;
        bindings::register(&lua, state)?;
        Ok(Self { lua })
    }

    /// Runs the script at `path` to completion.
    pub fn exec_file(&self, path: &Path) -> Result<(), HostError> {
        let source = std::fs::read(path).map_err(|source| HostError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("running script {}", path.display());
        self.lua
            .load(source)
            .set_name(format!("@{}", path.display()))
            .exec()?;
        Ok(())
    }

    /// Reads `sunflower.debugger.pauseOnCrash`.
    ///
    /// Only a boolean `true` counts; anything else, including a namespace the
    /// script replaced or removed, reads as `false`.
    pub fn pause_on_crash(&self) -> bool {
        let read = || -> mlua::Result<Value> {
            let namespace: Table = self.lua.globals().get(NAMESPACE)?;
            let debugger: Table = namespace.get("debugger")?;
            debugger.get(PAUSE_ON_CRASH)
        };

        matches!(read(), Ok(Value::Boolean(true)))
    }

    #[cfg(test)]
    pub(crate) fn lua(&self) -> &Lua {
        &self.lua
    }
}
