use super::*;

impl TwitchApiClient {
    /// Get the live stream for a broadcaster login, or `None` when offline.
    pub async fn get_live_stream(&self, login: &str) -> Result<Option<LiveStream>, TwitchError> {
        let body = self
            .authenticated_get("streams", &[("user_login", login)])
            .await?;
        let resp: HelixResponse<StreamInfo> = serde_json::from_str(&body)?;
        Ok(resp.data.into_iter().next().and_then(StreamInfo::into_live))
    }
}
