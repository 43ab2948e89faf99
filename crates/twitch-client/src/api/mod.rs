//! Twitch Helix REST API client.
//!
//! Provides typed access to the user and stream endpoints with automatic
//! Bearer token + Client-ID header injection. A 401 response drops the
//! cached app token so the next call fetches a fresh one.

mod request;
mod streams;
mod users;

pub mod models;


pub use models::{HelixResponse, LiveStream, StreamInfo, TwitchUser};

use crate::auth::TokenManager;
use crate::{ClientConfig, TwitchError};

/// Twitch Helix API client with automatic auth header injection.
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) helix_base: String,
    pub(super) tokens: TokenManager,
}

impl TwitchApiClient {
    /// Build a client whose requests are all bounded by
    /// `config.request_timeout`.
    pub fn new(config: ClientConfig) -> Result<Self, TwitchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            tokens: TokenManager::new(&config, http.clone()),
            http,
            client_id: config.client_id,
            helix_base: config.helix_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Make sure an app token is held, requesting one if needed.
    pub async fn initialize(&self) -> Result<(), TwitchError> {
        self.tokens.ensure_token().await.map(|_| ())
    }

    /// Release the session credential.
    pub async fn close(&self) {
        self.tokens.clear().await;
    }
}
