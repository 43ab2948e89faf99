//! Stream status polling state machine.
//!
//! One poller watches one broadcaster for one session:
//!
//! ```text
//! CheckingExistence ──found──▶ WaitingOffline ⇄ Notified
//!        │                            │             │
//!        └── not found / error ──────▶ Terminated ◀─┘ (cancel)
//! ```
//!
//! Notifications are edge-triggered: only the offline to live transition
//! raises "Stream Started". Every suspension point is raced against the
//! session cancellation token.

pub mod message;
pub mod source;


use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use twitch_client::TwitchError;
use twitch_client::api::{LiveStream, TwitchUser};

use crate::config::defaults::{CHECK_INTERVAL_SECS, STREAMING_INTERVAL_SECS};
use crate::console;
use crate::lifecycle::RunState;
use crate::notification::{
    self, Notice, NotificationFormat, Notifier, TITLE_STREAM_STARTED, TITLE_STREAMER_FOUND,
};
use crate::services::profile_image::ProfileImageStore;

pub use source::StreamSource;

/// Sleep intervals between status checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Used while offline and after a failed check.
    pub check_interval: Duration,
    /// Used while live.
    pub streaming_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(CHECK_INTERVAL_SECS),
            streaming_interval: Duration::from_secs(STREAMING_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    CheckingExistence,
    WaitingOffline,
    Notified,
    Terminated,
}

/// Why a poller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerExit {
    NotFound,
    ExistenceCheckFailed,
    Cancelled,
}

/// What one status check decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub notify: Option<LiveStream>,
    pub next_interval: Duration,
}

pub struct StatusPoller {
    source: Arc<dyn StreamSource>,
    notifier: Arc<dyn Notifier>,
    images: Arc<ProfileImageStore>,
    config: PollerConfig,
    format: NotificationFormat,
    login: String,
    state: PollerState,
    was_live: bool,
    icon: Option<PathBuf>,
}

/// Returns `true` if the token was cancelled before the sleep elapsed.
async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

/// Run `fut` unless the token fires first.
async fn or_cancel<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}

impl StatusPoller {
    pub fn new(
        source: Arc<dyn StreamSource>,
        notifier: Arc<dyn Notifier>,
        images: Arc<ProfileImageStore>,
        config: PollerConfig,
        format: NotificationFormat,
        login: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            images,
            config,
            format,
            login: login.into(),
            state: PollerState::CheckingExistence,
            was_live: false,
            icon: None,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Run until the broadcaster is rejected or the session is cancelled.
    pub async fn run(mut self, run: &RunState) -> PollerExit {
        let token = run.token().clone();

        let exit = match self.check_existence(&token).await {
            Some(Ok(())) => self.poll_loop(run, &token).await,
            Some(Err(exit)) => exit,
            None => PollerExit::Cancelled,
        };

        self.state = PollerState::Terminated;
        tracing::info!(login = %self.login, ?exit, "Status poller stopped");
        exit
    }

    /// `None` when cancelled mid-check.
    async fn check_existence(&mut self, token: &CancellationToken) -> Option<Result<(), PollerExit>> {
        console::say(message::PLEASE_WAIT);

        let user = match or_cancel(token, self.source.lookup_broadcaster(&self.login)).await? {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(login = %self.login, "Broadcaster not found");
                console::say_about(&self.login, &message::not_found_message(&self.login));
                return Some(Err(PollerExit::NotFound));
            }
            Err(e) => {
                tracing::error!(login = %self.login, "Existence check failed: {e}");
                console::say(message::EXISTENCE_CHECK_FAILED);
                return Some(Err(PollerExit::ExistenceCheckFailed));
            }
        };

        tracing::info!(login = %self.login, user_id = %user.id, "Broadcaster found");

        if self.format == NotificationFormat::Dialog {
            let icon = or_cancel(token, self.prepare_icon(&user)).await?;
            self.icon = Some(icon);
        }

        let found = message::found_message(&self.login);
        console::say_about(&self.login, &found);

        let mut notice = Notice::new(found, TITLE_STREAMER_FOUND);
        if let Some(icon) = &self.icon {
            notice = notice.with_icon(icon.clone());
        }
        or_cancel(token, notification::deliver(self.notifier.as_ref(), &notice)).await?;

        console::say(message::HOW_TO_QUIT);
        self.state = PollerState::WaitingOffline;
        Some(Ok(()))
    }

    /// Download the profile image, falling back to the bundled icon.
    async fn prepare_icon(&self, user: &TwitchUser) -> PathBuf {
        let Some(url) = user.profile_image() else {
            return self.images.default_icon();
        };

        let bytes = match self.source.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url, "Failed to download profile image: {e}");
                return self.images.default_icon();
            }
        };

        match self.images.save(url, &bytes).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(url, "Failed to save profile image: {e}");
                self.images.default_icon()
            }
        }
    }

    async fn poll_loop(&mut self, run: &RunState, token: &CancellationToken) -> PollerExit {
        loop {
            if !run.is_running() {
                return PollerExit::Cancelled;
            }

            let Some(observed) = or_cancel(token, self.source.get_live_stream(&self.login)).await
            else {
                return PollerExit::Cancelled;
            };

            let step = self.observe(observed);

            if let Some(live) = step.notify {
                if !run.is_running() {
                    return PollerExit::Cancelled;
                }
                if or_cancel(token, self.announce(&live)).await.is_none() {
                    return PollerExit::Cancelled;
                }
            }

            if sleep_or_cancel(token, step.next_interval).await {
                return PollerExit::Cancelled;
            }
        }
    }

    /// Fold one status observation into the edge flag and pick the next
    /// interval.
    pub(crate) fn observe(&mut self, observed: Result<Option<LiveStream>, TwitchError>) -> Step {
        match observed {
            Ok(Some(live)) => {
                let notify = (!self.was_live).then_some(live);
                if notify.is_some() {
                    tracing::info!(login = %self.login, "Stream went live");
                }
                self.was_live = true;
                self.state = PollerState::Notified;
                Step {
                    notify,
                    next_interval: self.config.streaming_interval,
                }
            }
            Ok(None) => {
                if self.was_live {
                    tracing::info!(login = %self.login, "Stream went offline");
                    self.state = PollerState::WaitingOffline;
                }
                self.was_live = false;
                Step {
                    notify: None,
                    next_interval: self.config.check_interval,
                }
            }
            Err(e) => {
                tracing::warn!(login = %self.login, "Stream status check failed: {e}");
                Step {
                    notify: None,
                    next_interval: self.config.check_interval,
                }
            }
        }
    }

    async fn announce(&self, live: &LiveStream) {
        let text = message::format_stream_message(&self.login, &live.display_name, &live.title);
        console::say(&text);

        let mut notice = Notice::new(text, TITLE_STREAM_STARTED);
        if self.format == NotificationFormat::Dialog {
            if let Some(icon) = &self.icon {
                notice = notice.with_icon(icon.clone());
            }
            if let Some(link) = message::channel_url(&self.login) {
                notice = notice.with_link(link);
            }
        }
        notification::deliver(self.notifier.as_ref(), &notice).await;
    }
}
