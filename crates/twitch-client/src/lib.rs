//! Twitch integration client library.
//!
//! Provides app access token management (client-credentials grant) and a
//! Helix REST client for broadcaster lookup and live-stream status.

pub mod api;
pub mod auth;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HELIX_BASE: &str = "https://api.twitch.tv/helix";
pub const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// App access token obtained through the client-credentials grant.
///
/// There is no expiry tracking: the token is used until an API call is
/// rejected with 401, after which it is dropped and fetched again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppToken {
    pub access_token: String,
    pub obtained_at: DateTime<Utc>,
}

/// Immutable connection settings shared by [`auth::TokenManager`] and
/// [`api::TwitchApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub helix_base: String,
    pub token_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            helix_base: HELIX_BASE.into(),
            token_url: TOKEN_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Access token request failed: {0}")]
    Auth(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl TwitchError {
    /// Map a transport error, keeping timeouts distinguishable.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Credential acquisition failed.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ApiError { status: 401, .. })
    }
}
