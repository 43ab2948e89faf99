//! Console and notification message text.

pub const PLEASE_WAIT: &str = "Please wait a moment.";
pub const HOW_TO_QUIT: &str = "Type [q] to quit the application.";
pub const EXISTENCE_CHECK_FAILED: &str = "Failed to check streamer existence.";

const CHANNEL_BASE: &str = "https://www.twitch.tv/";

/// Message announcing that `login` went live.
///
/// The login is shown next to the display name only when the two differ
/// beyond letter case.
pub fn format_stream_message(login: &str, display_name: &str, title: &str) -> String {
    if login.to_lowercase() == display_name.to_lowercase() {
        format!("{display_name} has started streaming: {title}")
    } else {
        format!("{display_name}({login}) has started streaming: {title}")
    }
}

pub fn found_message(login: &str) -> String {
    format!("{login} found. You will be notified when the streaming starts.")
}

pub fn not_found_message(login: &str) -> String {
    format!("{login} not found.")
}

pub fn channel_url(login: &str) -> Option<url::Url> {
    url::Url::parse(CHANNEL_BASE).ok()?.join(login).ok()
}
