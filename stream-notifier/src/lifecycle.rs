//! Session lifecycle: task spawning, cancellation, and teardown.
//!
//! [`LifecycleController::run`] starts the status poller and the quit
//! listener as two tasks sharing one cancellation token. Whichever ends
//! first cancels the other, and [`LifecycleController::cleanup`] joins both
//! before releasing the credential and the downloaded profile image.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::io::AsyncBufRead;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::console;
use crate::notification::{NotificationFormat, Notifier};
use crate::poller::{PollerConfig, PollerExit, StatusPoller, StreamSource};
use crate::quit::{self, QuitEvent};
use crate::services::profile_image::ProfileImageStore;

/// Running flag plus the session cancellation token.
///
/// The flag only ever goes from `true` to `false`.
#[derive(Debug, Clone)]
pub struct RunState {
    running: Arc<AtomicBool>,
    token: CancellationToken,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            token: CancellationToken::new(),
        }
    }

    /// False once the session is cancelled, even before cleanup has
    /// cleared the flag.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.token.is_cancelled()
    }

    /// End the session. Loops stop at their next suspension point; the flag
    /// is left for [`stop`](Self::stop) so cleanup still runs exactly once.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Clear the flag and cancel the token. Returns `true` only for the
    /// call that actually cleared the flag.
    pub fn stop(&self) -> bool {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        self.token.cancel();
        was_running
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// What the user asked to monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRequest {
    pub login: String,
    pub format: NotificationFormat,
}

/// How a monitoring session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    Interrupted,
    NotFound,
    ExistenceCheckFailed,
    AuthFailed,
}

impl SessionOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, Self::ExistenceCheckFailed | Self::AuthFailed)
    }
}

pub struct LifecycleController {
    source: Arc<dyn StreamSource>,
    notifier: Arc<dyn Notifier>,
    images: Arc<ProfileImageStore>,
    config: PollerConfig,
    run_state: RunState,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    outcome: OnceLock<SessionOutcome>,
    complete: watch::Sender<bool>,
}

impl LifecycleController {
    pub fn new(
        source: Arc<dyn StreamSource>,
        notifier: Arc<dyn Notifier>,
        images: Arc<ProfileImageStore>,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            images,
            config,
            run_state: RunState::new(),
            tasks: Mutex::new(Vec::new()),
            outcome: OnceLock::new(),
            complete: watch::Sender::new(false),
        }
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Monitor `request.login` until quit, shutdown, or a terminal poller
    /// outcome, then clean up.
    pub async fn run<R>(self: &Arc<Self>, request: MonitorRequest, quit_input: R) -> SessionOutcome
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        tracing::info!(login = %request.login, format = %request.format, "Starting monitoring session");

        let init = tokio::select! {
            _ = self.run_state.cancelled() => Ok(()),
            result = self.source.initialize() => result,
        };
        if let Err(e) = init {
            tracing::error!("Failed to obtain app access token: {e}");
            console::say("Failed to authenticate with Twitch.");
            self.finish(SessionOutcome::AuthFailed);
            self.cleanup().await;
            return self.outcome();
        }

        let poller = StatusPoller::new(
            self.source.clone(),
            self.notifier.clone(),
            self.images.clone(),
            self.config,
            request.format,
            request.login,
        );
        let this = Arc::clone(self);
        self.spawn(async move {
            match poller.run(&this.run_state).await {
                PollerExit::NotFound => this.finish(SessionOutcome::NotFound),
                PollerExit::ExistenceCheckFailed => {
                    this.finish(SessionOutcome::ExistenceCheckFailed)
                }
                PollerExit::Cancelled => {}
            }
        })
        .await;

        let this = Arc::clone(self);
        self.spawn(async move {
            if quit::listen_for_quit(quit_input, &this.run_state).await == QuitEvent::Requested {
                this.finish(SessionOutcome::Quit);
            }
        })
        .await;

        self.run_state.cancelled().await;
        self.cleanup().await;
        self.outcome()
    }

    /// End the session from outside, e.g. on a termination signal.
    pub fn request_shutdown(&self) {
        tracing::info!("Shutdown requested");
        self.finish(SessionOutcome::Interrupted);
    }

    /// Record the first outcome and cancel the session.
    fn finish(&self, outcome: SessionOutcome) {
        if self.outcome.set(outcome).is_ok() {
            tracing::debug!(?outcome, "Session outcome recorded");
        }
        self.run_state.cancel();
    }

    fn outcome(&self) -> SessionOutcome {
        self.outcome
            .get()
            .copied()
            .unwrap_or(SessionOutcome::Interrupted)
    }

    /// Spawn a session task. Its completion cancels the session.
    async fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.run_state.is_running() {
            tracing::debug!("Session not running, task not spawned");
            return false;
        }

        let guard = self.run_state.token().clone().drop_guard();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            fut.await;
        });
        self.tasks.lock().await.push(handle);
        true
    }

    /// Tear the session down. Only the first call does any work.
    pub async fn cleanup(&self) {
        if !self.run_state.stop() {
            tracing::debug!("Cleanup already performed");
            return;
        }
        tracing::info!("Starting application cleanup...");

        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for handle in tasks {
            if let Err(e) = handle.await {
                tracing::error!("Session task failed: {e}");
            }
        }

        self.source.close().await;
        self.images.remove().await;

        self.complete.send_replace(true);
        tracing::info!("Application cleanup completed");
    }

    /// Resolves once cleanup has finished.
    pub async fn wait_cleanup_complete(&self) {
        let mut rx = self.complete.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::{FakeSource, RecordingNotifier, live, user};

    struct Session {
        source: Arc<FakeSource>,
        images: Arc<ProfileImageStore>,
        controller: Arc<LifecycleController>,
        _dir: tempfile::TempDir,
    }

    fn session(source: FakeSource) -> Session {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(source);
        let images = Arc::new(ProfileImageStore::new(dir.path().to_path_buf()));
        let controller = Arc::new(LifecycleController::new(
            source.clone(),
            Arc::new(RecordingNotifier::default()),
            images.clone(),
            PollerConfig::default(),
        ));
        Session {
            source,
            images,
            controller,
            _dir: dir,
        }
    }

    fn request(login: &str) -> MonitorRequest {
        MonitorRequest {
            login: login.into(),
            format: NotificationFormat::Notification,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn quit_input_ends_session() {
        let s = session(FakeSource::found(user("alice", "Alice")).streams([Ok(None)]));

        let outcome = s.controller.run(request("alice"), &b"q\n"[..]).await;

        assert_eq!(outcome, SessionOutcome::Quit);
        assert!(!s.controller.is_running());
        assert_eq!(s.source.close_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_ends_session_without_quit() {
        let s = session(FakeSource::not_found());

        let outcome = s.controller.run(request("ghost"), tokio::io::empty()).await;

        assert_eq!(outcome, SessionOutcome::NotFound);
        assert_eq!(s.source.stream_call_count(), 0);
        assert_eq!(s.source.close_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn existence_failure_is_reported() {
        let s = session(FakeSource::with_lookup(Err(twitch_client::TwitchError::Timeout)));

        let outcome = s.controller.run(request("alice"), tokio::io::empty()).await;

        assert_eq!(outcome, SessionOutcome::ExistenceCheckFailed);
        assert!(outcome.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_request_interrupts_monitoring() {
        let s = session(
            FakeSource::found(user("alice", "Alice"))
                .streams([Ok(Some(live("alice", "Alice", "Coding")))]),
        );

        let controller = s.controller.clone();
        let handle = tokio::spawn(async move {
            controller.run(request("alice"), tokio::io::empty()).await
        });

        s.source.drained.notified().await;
        s.controller.request_shutdown();

        assert_eq!(handle.await.unwrap(), SessionOutcome::Interrupted);
        s.controller.wait_cleanup_complete().await;
        assert_eq!(s.source.close_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_cleans_up() {
        let s = session(FakeSource::found(user("alice", "Alice")).failing_init());

        let outcome = s.controller.run(request("alice"), tokio::io::empty()).await;

        assert_eq!(outcome, SessionOutcome::AuthFailed);
        assert_eq!(s.source.stream_call_count(), 0);
        assert_eq!(s.source.close_count(), 1);
        s.controller.wait_cleanup_complete().await;
    }

    #[tokio::test(start_paused = true)]
    async fn hung_status_call_does_not_block_quit() {
        let s = session(FakeSource::found(user("alice", "Alice")));

        let (mut writer, reader) = tokio::io::duplex(64);
        let controller = s.controller.clone();
        let handle = tokio::spawn(async move {
            controller
                .run(request("alice"), tokio::io::BufReader::new(reader))
                .await
        });

        s.source.drained.notified().await;
        tokio::io::AsyncWriteExt::write_all(&mut writer, b"q\n")
            .await
            .unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("quit blocked by hung status call")
            .unwrap();
        assert_eq!(outcome, SessionOutcome::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_deletes_downloaded_profile_image() {
        let mut alice = user("alice", "Alice");
        alice.profile_image_url = Some("https://static-cdn.example/pictures/alice.png".into());
        let s = session(FakeSource::found(alice).image(b"png").streams([Ok(None)]));

        let (mut writer, reader) = tokio::io::duplex(64);
        let controller = s.controller.clone();
        let handle = tokio::spawn(async move {
            let request = MonitorRequest {
                login: "alice".into(),
                format: NotificationFormat::Dialog,
            };
            controller
                .run(request, tokio::io::BufReader::new(reader))
                .await
        });

        s.source.drained.notified().await;
        let icon = s.images.saved_path().await.expect("profile image not saved");
        assert!(icon.exists());

        tokio::io::AsyncWriteExt::write_all(&mut writer, b"q\n")
            .await
            .unwrap();
        assert_eq!(handle.await.unwrap(), SessionOutcome::Quit);

        assert!(!icon.exists());
        assert_eq!(s.images.saved_path().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_is_idempotent() {
        let s = session(FakeSource::found(user("alice", "Alice")));
        let mut done = s.controller.complete.subscribe();

        s.controller.cleanup().await;
        assert!(done.has_changed().unwrap());
        done.borrow_and_update();

        s.controller.cleanup().await;
        assert!(!done.has_changed().unwrap());
        assert_eq!(s.source.close_count(), 1);
        assert!(!s.controller.is_running());
    }

    #[tokio::test]
    async fn no_tasks_spawn_after_cleanup() {
        let s = session(FakeSource::not_found());
        s.controller.cleanup().await;

        assert!(!s.controller.spawn(async {}).await);
        assert!(s.controller.tasks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn shutdown_request_stops_running_before_cleanup() {
        let s = session(FakeSource::not_found());

        s.controller.request_shutdown();
        assert!(!s.controller.is_running());
        assert!(!s.controller.spawn(async {}).await);

        s.controller.cleanup().await;
        assert_eq!(s.source.close_count(), 1);
    }

    #[test]
    fn cancel_keeps_cleanup_pending() {
        let state = RunState::new();
        state.cancel();
        assert!(!state.is_running());
        assert!(state.stop());
        assert!(!state.stop());
    }

    #[test]
    fn run_state_stop_is_monotonic() {
        let state = RunState::new();
        assert!(state.is_running());
        assert!(state.stop());
        assert!(!state.stop());
        assert!(!state.is_running());
        assert!(state.token().is_cancelled());
    }
}
