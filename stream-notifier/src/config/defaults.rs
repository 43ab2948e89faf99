//! Default values for every tunable setting.

pub const CHECK_INTERVAL_SECS: u64 = 60;
pub const STREAMING_INTERVAL_SECS: u64 = 60 * 60;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const OSASCRIPT_PATH: &str = "/usr/bin/osascript";

pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_CHECK_INTERVAL: &str = "CHECK_INTERVAL_SECS";
pub const ENV_STREAMING_INTERVAL: &str = "STREAMING_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_BASE_DIR: &str = "STREAM_NOTIFIER_BASE_DIR";
pub const ENV_OSASCRIPT_PATH: &str = "OSASCRIPT_PATH";
