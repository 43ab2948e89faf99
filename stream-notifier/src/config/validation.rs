//! Input validation for monitoring settings.

use regex::Regex;
use std::sync::LazyLock;

static RE_LOGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

/// Validate a broadcaster login. Returns `Ok(())` if valid, or an error message.
pub fn validate_login(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Username cannot be empty".into());
    }
    if !RE_LOGIN.is_match(value) {
        return Err("Username must be alphanumeric".into());
    }
    Ok(())
}
