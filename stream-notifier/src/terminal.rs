//! Host terminal window for packaged (app bundle) runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::services::osascript::{OsaScript, ScriptError};

const LAUNCH_SCRIPT: &str = "launch_terminal.applescript";
const CLOSE_SCRIPT: &str = "close_terminal.applescript";

#[async_trait]
pub trait TerminalHost: Send + Sync {
    /// Open a terminal window that re-runs the application inside it.
    async fn launch(&self) -> Result<(), ScriptError>;

    /// Close the window the application is running in.
    async fn close(&self) -> Result<(), ScriptError>;
}

pub struct ScriptTerminal {
    runner: OsaScript,
    base_dir: PathBuf,
}

impl ScriptTerminal {
    pub fn new(runner: OsaScript, base_dir: PathBuf) -> Self {
        Self { runner, base_dir }
    }
}

#[async_trait]
impl TerminalHost for ScriptTerminal {
    async fn launch(&self) -> Result<(), ScriptError> {
        tracing::info!(base_dir = %self.base_dir.display(), "Launching host terminal");
        self.runner.run(LAUNCH_SCRIPT, [self.base_dir.as_os_str()]).await
    }

    async fn close(&self) -> Result<(), ScriptError> {
        self.runner.run(CLOSE_SCRIPT, Vec::<String>::new()).await
    }
}

/// True when `exe` sits in the `Contents/MacOS` directory of an `.app` bundle.
pub fn is_packaged_executable(exe: &Path) -> bool {
    let Some(macos) = exe.parent() else {
        return false;
    };
    let Some(contents) = macos.parent() else {
        return false;
    };
    let Some(bundle) = contents.parent() else {
        return false;
    };

    macos.file_name().is_some_and(|n| n == "MacOS")
        && contents.file_name().is_some_and(|n| n == "Contents")
        && bundle.extension().is_some_and(|ext| ext == "app")
}

pub fn running_packaged() -> bool {
    std::env::current_exe()
        .map(|exe| is_packaged_executable(&exe))
        .unwrap_or(false)
}
