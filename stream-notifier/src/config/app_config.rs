//! Runtime application configuration loaded from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use twitch_client::ClientConfig;

use super::ConfigError;
use super::defaults::*;
use crate::poller::PollerConfig;

/// Immutable runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub check_interval: Duration,
    pub streaming_interval: Duration,
    pub request_timeout: Duration,
    /// Directory holding the executable; `applescript/` lives below it.
    pub base_dir: PathBuf,
    pub osascript_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let client_id = required(ENV_CLIENT_ID)?;
        let client_secret = required(ENV_CLIENT_SECRET)?;

        let base_dir = match get(ENV_BASE_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => executable_dir()?,
        };

        let osascript_path = get(ENV_OSASCRIPT_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(OSASCRIPT_PATH));

        Ok(Self {
            client_id,
            client_secret,
            check_interval: secs(get(ENV_CHECK_INTERVAL), CHECK_INTERVAL_SECS),
            streaming_interval: secs(get(ENV_STREAMING_INTERVAL), STREAMING_INTERVAL_SECS),
            request_timeout: secs(get(ENV_REQUEST_TIMEOUT), REQUEST_TIMEOUT_SECS),
            base_dir,
            osascript_path,
        })
    }

    pub fn script_dir(&self) -> PathBuf {
        self.base_dir.join("applescript")
    }

    /// `Resources/` sits next to the executable directory inside an app bundle.
    pub fn resources_dir(&self) -> PathBuf {
        self.base_dir
            .parent()
            .unwrap_or(Path::new("."))
            .join("Resources")
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            check_interval: self.check_interval,
            streaming_interval: self.streaming_interval,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.client_id.clone(), self.client_secret.clone())
            .with_request_timeout(self.request_timeout)
    }
}

fn executable_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::BaseDir)?;
    let exe = exe.canonicalize().unwrap_or(exe);
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Parse a positive number of seconds, falling back to `default`.
fn secs(value: Option<String>, default: u64) -> Duration {
    let parsed = value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default);
    Duration::from_secs(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_credentials_set() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLIENT_ID", "cid"),
            ("CLIENT_SECRET", "secret"),
            ("STREAM_NOTIFIER_BASE_DIR", "/Applications/Notifier.app/Contents/MacOS"),
        ]))
        .unwrap();

        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.streaming_interval, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.osascript_path, PathBuf::from("/usr/bin/osascript"));
        assert_eq!(
            config.script_dir(),
            PathBuf::from("/Applications/Notifier.app/Contents/MacOS/applescript")
        );
        assert_eq!(
            config.resources_dir(),
            PathBuf::from("/Applications/Notifier.app/Contents/Resources")
        );
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[("CLIENT_ID", "cid")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CLIENT_SECRET")));
    }

    #[test]
    fn blank_client_id_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("CLIENT_ID", "  "), ("CLIENT_SECRET", "s")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CLIENT_ID")));
    }

    #[test]
    fn interval_overrides_ignore_invalid_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLIENT_ID", "cid"),
            ("CLIENT_SECRET", "secret"),
            ("STREAM_NOTIFIER_BASE_DIR", "/tmp/notifier"),
            ("CHECK_INTERVAL_SECS", "15"),
            ("STREAMING_INTERVAL_SECS", "0"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();

        assert_eq!(config.check_interval, Duration::from_secs(15));
        assert_eq!(config.streaming_interval, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        let poller = config.poller_config();
        assert_eq!(poller.check_interval, Duration::from_secs(15));
        assert_eq!(config.client_config().request_timeout, Duration::from_secs(10));
    }
}
