//! App access token management for Twitch.
//!
//! Tokens are fetched with the OAuth2 client-credentials grant and cached
//! until [`TokenManager::clear`] is called.

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{AppToken, ClientConfig, TwitchError};

const GRANT_TYPE: &str = "client_credentials";

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

/// Acquires and caches a single app access token.
///
/// The slot lock is held across the token request, so concurrent callers of
/// [`ensure_token`](Self::ensure_token) wait for one in-flight request and
/// then share its result.
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: reqwest::Client,
    token: Mutex<Option<AppToken>>,
}

impl TokenManager {
    pub fn new(config: &ClientConfig, http: reqwest::Client) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url.clone(),
            http,
            token: Mutex::new(None),
        }
    }

    /// Return the cached token, requesting a new one if none is held.
    pub async fn ensure_token(&self) -> Result<AppToken, TwitchError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        let token = self.request_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token. The next [`ensure_token`](Self::ensure_token)
    /// call fetches a fresh one.
    pub async fn clear(&self) {
        if self.token.lock().await.take().is_some() {
            tracing::debug!("Cleared cached app access token");
        }
    }

    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    async fn request_token(&self) -> Result<AppToken, TwitchError> {
        tracing::info!("Requesting Twitch app access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", GRANT_TYPE),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| TwitchError::Auth(transport_reason(&e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TwitchError::Auth(transport_reason(&e)))?;

        parse_token_response(status, &body)
    }
}

fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "token request timed out".into()
    } else {
        err.to_string()
    }
}

/// Parse the token endpoint response into an [`AppToken`].
fn parse_token_response(status: reqwest::StatusCode, body: &str) -> Result<AppToken, TwitchError> {
    if !status.is_success() {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            status: Some(status.as_u16()),
            message: Some(body.to_string()),
        });
        return Err(TwitchError::Auth(format!(
            "{}: {}",
            err.status.unwrap_or(status.as_u16()),
            err.message.unwrap_or_default()
        )));
    }

    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TwitchError::Auth(format!("failed to parse response: {e}")))?;

    tracing::info!(
        expires_in = token_resp.expires_in,
        "Obtained Twitch app access token"
    );

    Ok(AppToken {
        access_token: token_resp.access_token,
        obtained_at: Utc::now(),
    })
}
