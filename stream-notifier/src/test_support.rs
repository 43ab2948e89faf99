//! Scripted fakes for the poller and lifecycle tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;
use twitch_client::TwitchError;
use twitch_client::api::{LiveStream, TwitchUser};

use crate::notification::{Notice, Notifier, ScriptError};
use crate::poller::StreamSource;

pub fn user(login: &str, display_name: &str) -> TwitchUser {
    TwitchUser {
        id: "1001".into(),
        login: login.into(),
        display_name: display_name.into(),
        broadcaster_type: String::new(),
        profile_image_url: None,
    }
}

pub fn live(login: &str, display_name: &str, title: &str) -> LiveStream {
    LiveStream {
        login: login.into(),
        display_name: display_name.into(),
        title: title.into(),
    }
}

pub type Observation = Result<Option<LiveStream>, TwitchError>;

/// Plays back a fixed list of stream observations, then hangs.
pub struct FakeSource {
    lookup: Mutex<Option<Result<Option<TwitchUser>, TwitchError>>>,
    init_error: Mutex<Option<TwitchError>>,
    streams: Mutex<VecDeque<Observation>>,
    image: Option<Vec<u8>>,
    pub drained: Notify,
    pub stream_calls: Mutex<Vec<Instant>>,
    pub closes: AtomicUsize,
}

impl FakeSource {
    pub fn found(user: TwitchUser) -> Self {
        Self::with_lookup(Ok(Some(user)))
    }

    pub fn not_found() -> Self {
        Self::with_lookup(Ok(None))
    }

    pub fn with_lookup(lookup: Result<Option<TwitchUser>, TwitchError>) -> Self {
        Self {
            lookup: Mutex::new(Some(lookup)),
            init_error: Mutex::new(None),
            streams: Mutex::new(VecDeque::new()),
            image: None,
            drained: Notify::new(),
            stream_calls: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn streams(self, observations: impl IntoIterator<Item = Observation>) -> Self {
        *self.streams.lock().unwrap() = observations.into_iter().collect();
        self
    }

    pub fn image(mut self, bytes: &[u8]) -> Self {
        self.image = Some(bytes.to_vec());
        self
    }

    pub fn failing_init(self) -> Self {
        *self.init_error.lock().unwrap() = Some(TwitchError::Auth("status 403".into()));
        self
    }

    pub fn stream_call_count(&self) -> usize {
        self.stream_calls.lock().unwrap().len()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamSource for FakeSource {
    async fn initialize(&self) -> Result<(), TwitchError> {
        match self.init_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn lookup_broadcaster(&self, _login: &str) -> Result<Option<TwitchUser>, TwitchError> {
        self.lookup
            .lock()
            .unwrap()
            .take()
            .expect("lookup_broadcaster called twice")
    }

    async fn get_live_stream(&self, _login: &str) -> Result<Option<LiveStream>, TwitchError> {
        self.stream_calls.lock().unwrap().push(Instant::now());
        let next = self.streams.lock().unwrap().pop_front();
        match next {
            Some(observation) => observation,
            None => {
                self.drained.notify_one();
                std::future::pending().await
            }
        }
    }

    async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, TwitchError> {
        self.image.clone().ok_or(TwitchError::ApiError {
            status: 404,
            message: "no image".into(),
        })
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every notice; optionally fails each delivery after recording it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn titled(&self, title: &str) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.title == title)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), ScriptError> {
        self.notices.lock().unwrap().push(notice.clone());
        if self.fail {
            return Err(ScriptError::NotFound("notification.applescript".into()));
        }
        Ok(())
    }
}
