//! AppleScript-backed notifier.

use std::path::Path;

use async_trait::async_trait;

use super::{Notice, Notifier};
use crate::services::osascript::{OsaScript, ScriptError};

const NOTIFICATION_SCRIPT: &str = "notification.applescript";
const DIALOG_SCRIPT: &str = "dialog.applescript";
const STARTING_DIALOG_SCRIPT: &str = "starting_dialog.applescript";

/// Picks a script by what the notice carries: a link opens the stream
/// dialog, an icon alone opens the starting dialog, otherwise a plain
/// system notification is posted.
pub struct ScriptNotifier {
    runner: OsaScript,
}

impl ScriptNotifier {
    pub fn new(runner: OsaScript) -> Self {
        Self { runner }
    }
}

/// Script file and argument list for `notice`.
pub(crate) fn script_invocation(notice: &Notice) -> (&'static str, Vec<String>) {
    let mut args = vec![notice.message.clone(), notice.title.clone()];

    match (&notice.link, &notice.icon) {
        (Some(link), icon) => {
            args.push(link.to_string());
            args.push(icon.as_deref().map(display).unwrap_or_default());
            (DIALOG_SCRIPT, args)
        }
        (None, Some(icon)) => {
            args.push(display(icon));
            (STARTING_DIALOG_SCRIPT, args)
        }
        (None, None) => (NOTIFICATION_SCRIPT, args),
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[async_trait]
impl Notifier for ScriptNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), ScriptError> {
        let (script, args) = script_invocation(notice);
        self.runner.run(script, &args).await
    }
}
