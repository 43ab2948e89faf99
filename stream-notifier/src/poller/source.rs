//! The platform calls the poller depends on.

use async_trait::async_trait;
use twitch_client::TwitchError;
use twitch_client::api::{LiveStream, TwitchApiClient, TwitchUser};

#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Acquire the session credential.
    async fn initialize(&self) -> Result<(), TwitchError>;

    /// `Ok(None)` when no broadcaster has this login.
    async fn lookup_broadcaster(&self, login: &str) -> Result<Option<TwitchUser>, TwitchError>;

    /// `Ok(None)` when the broadcaster is offline.
    async fn get_live_stream(&self, login: &str) -> Result<Option<LiveStream>, TwitchError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TwitchError>;

    /// Release the session credential.
    async fn close(&self);
}

#[async_trait]
impl StreamSource for TwitchApiClient {
    async fn initialize(&self) -> Result<(), TwitchError> {
        TwitchApiClient::initialize(self).await
    }

    async fn lookup_broadcaster(&self, login: &str) -> Result<Option<TwitchUser>, TwitchError> {
        TwitchApiClient::lookup_broadcaster(self, login).await
    }

    async fn get_live_stream(&self, login: &str) -> Result<Option<LiveStream>, TwitchError> {
        TwitchApiClient::get_live_stream(self, login).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TwitchError> {
        TwitchApiClient::fetch_bytes(self, url).await
    }

    async fn close(&self) {
        TwitchApiClient::close(self).await
    }
}
