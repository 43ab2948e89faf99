//! Runs bundled AppleScript files through `osascript`.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

/// A notification or terminal script failed to execute.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to spawn {script}: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{script} exited with {code:?}: {stderr}")]
    Failed {
        script: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Locates scripts under one directory and runs them with the configured
/// `osascript` binary.
#[derive(Debug, Clone)]
pub struct OsaScript {
    program: PathBuf,
    script_dir: PathBuf,
}

impl OsaScript {
    pub fn new(program: PathBuf, script_dir: PathBuf) -> Self {
        Self {
            program,
            script_dir,
        }
    }

    /// Run `script` with positional arguments and wait for it to exit.
    pub async fn run<I, S>(&self, script: &str, args: I) -> Result<(), ScriptError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let path = self.script_dir.join(script);
        if !path.exists() {
            return Err(ScriptError::NotFound(path));
        }

        let output = Command::new(&self.program)
            .arg(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ScriptError::Spawn {
                script: script.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScriptError::Failed {
                script: script.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(script, "Script finished");
        Ok(())
    }
}
