use super::*;

impl TwitchApiClient {
    /// Look up a broadcaster by login name.
    ///
    /// Returns `Ok(None)` when Twitch knows no such account.
    pub async fn lookup_broadcaster(&self, login: &str) -> Result<Option<TwitchUser>, TwitchError> {
        let body = self.authenticated_get("users", &[("login", login)]).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)?;
        Ok(resp.data.into_iter().next())
    }
}
