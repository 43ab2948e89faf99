//! Notification type definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How stream events are presented, chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFormat {
    /// Transient system notification.
    #[default]
    Notification,
    /// Modal dialog with the broadcaster's icon and a channel link.
    Dialog,
}

impl NotificationFormat {
    pub const ALL: [NotificationFormat; 2] = [Self::Notification, Self::Dialog];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notification => "Notification",
            Self::Dialog => "Dialog",
        }
    }
}

impl fmt::Display for NotificationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notification" => Ok(Self::Notification),
            "dialog" => Ok(Self::Dialog),
            _ => Err("Invalid notification method. Valid options are: Notification, Dialog".into()),
        }
    }
}

/// A single message handed to a [`Notifier`](super::Notifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub title: String,
    pub icon: Option<PathBuf>,
    pub link: Option<url::Url>,
}

impl Notice {
    pub fn new(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
            icon: None,
            link: None,
        }
    }

    pub fn with_icon(mut self, icon: PathBuf) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_link(mut self, link: url::Url) -> Self {
        self.link = Some(link);
        self
    }
}
