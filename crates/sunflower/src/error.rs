use std::path::PathBuf;

/// Terminal host failures.
///
/// Every variant ends the process with a non-zero status; there is no retry
/// or partial-success path.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("graphics subsystem could not initialize: {0:#}")]
    Graphics(anyhow::Error),

    #[error("could not read script {}: {source}", path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script error: {0}")]
    Script(#[from] mlua::Error),

    #[error("initialization failed: the script finished without a window and renderer")]
    NotInitialized,

    #[error("rendering failed: {0:#}")]
    Render(anyhow::Error),
}

impl HostError {
    /// Process exit status reported for this failure.
    pub const fn exit_code(&self) -> i32 {
        -1
    }
}
