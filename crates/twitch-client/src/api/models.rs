use serde::{Deserialize, Serialize};

/// Wrapper for Twitch Helix list responses.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
}

/// User information from GET /helix/users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl TwitchUser {
    /// Profile image URL, if Twitch returned a non-empty one.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

/// Stream information from GET /helix/streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfo {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(rename = "type", default)]
    pub stream_type: String,
}

/// The "currently live" fact for one broadcaster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStream {
    pub login: String,
    pub display_name: String,
    pub title: String,
}

impl StreamInfo {
    /// Convert into a [`LiveStream`]. Entries missing a display name or
    /// title count as offline.
    pub fn into_live(self) -> Option<LiveStream> {
        if self.user_name.is_empty() || self.title.is_empty() {
            return None;
        }
        Some(LiveStream {
            login: self.user_login,
            display_name: self.user_name,
            title: self.title,
        })
    }
}
