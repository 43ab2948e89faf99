use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::*;
use crate::AppToken;

impl TwitchApiClient {
    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &AppToken) -> Result<HeaderMap, TwitchError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|_| TwitchError::Auth("access token is not a valid header value".into()))?;
        let client_id = HeaderValue::from_str(&self.client_id)
            .map_err(|_| TwitchError::Auth("client id is not a valid header value".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Client-Id", client_id);
        Ok(headers)
    }

    /// Execute a GET request against a Helix endpoint with auth headers.
    ///
    /// On 401 the cached token is cleared and the call fails; the caller's
    /// normal cadence performs the retry.
    pub(super) async fn authenticated_get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<String, TwitchError> {
        let token = self.tokens.ensure_token().await?;
        let headers = self.auth_headers(&token)?;
        let url = format!("{}/{endpoint}", self.helix_base);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .headers(headers)
            .send()
            .await
            .map_err(TwitchError::from_transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TwitchError::from_transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(url, "Got 401, dropping cached app token");
            self.tokens.clear().await;
            return Err(TwitchError::ApiError {
                status: 401,
                message: body,
            });
        }

        if !status.is_success() {
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    /// Download a resource without auth headers (e.g. a profile image).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TwitchError> {
        let url = url::Url::parse(url)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(TwitchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: "download failed".into(),
            });
        }

        let bytes = resp.bytes().await.map_err(TwitchError::from_transport)?;
        Ok(bytes.to_vec())
    }
}
