use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sunflower_engine::device::GpuInit;
use sunflower_engine::logging::LoggingConfig;

/// Directory, relative to the executable, holding the default script.
pub const DEFAULT_SCRIPT_DIR: &str = "Lua";

/// File name of the default script.
pub const DEFAULT_SCRIPT_FILE: &str = "Application.lua";

/// Host configuration.
///
/// Built from the command line; everything else takes its default.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub script_path: PathBuf,
    pub logging: LoggingConfig,
    pub gpu: GpuInit,
}

impl HostConfig {
    /// Builds the configuration from process arguments (program name first).
    ///
    /// Only the first positional argument is meaningful; any further ones are
    /// ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let script_arg = args.into_iter().nth(1);
        Self {
            script_path: resolve_script_path(script_arg, &executable_dir()),
            ..Self::default()
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(&executable_dir()),
            logging: LoggingConfig::default(),
            gpu: GpuInit::default(),
        }
    }
}

/// Picks the script to run: the argument verbatim when given, otherwise
/// `<exe_dir>/Lua/Application.lua`.
pub fn resolve_script_path(arg: Option<OsString>, exe_dir: &Path) -> PathBuf {
    match arg {
        Some(path) => PathBuf::from(path),
        None => default_script_path(exe_dir),
    }
}

pub fn default_script_path(exe_dir: &Path) -> PathBuf {
    exe_dir.join(DEFAULT_SCRIPT_DIR).join(DEFAULT_SCRIPT_FILE)
}

/// Directory containing the running executable.
///
/// Falls back to the empty path (the working directory) if the executable
/// cannot be located.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
}
