//! Desktop notification delivery for stream events.
//!
//! The poller decides when and what to send; a [`Notifier`] decides how.
//! Delivery failures never reach the poller state machine.

pub mod script;
pub mod types;

use async_trait::async_trait;

pub use crate::services::osascript::ScriptError;
pub use script::ScriptNotifier;
pub use types::{Notice, NotificationFormat};

pub const TITLE_STREAMER_FOUND: &str = "Streamer Found";
pub const TITLE_STREAM_STARTED: &str = "Stream Started";

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), ScriptError>;
}

/// Deliver `notice`, degrading to a console message on failure.
pub async fn deliver(notifier: &dyn Notifier, notice: &Notice) {
    if let Err(e) = notifier.notify(notice).await {
        tracing::warn!(title = notice.title, "Notification failed: {e}");
        crate::console::say("Failed to send notification");
    }
}
