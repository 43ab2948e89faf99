//! User-facing console output.
//!
//! Diagnostics go through `tracing` to stderr; these helpers print the
//! messages the user is meant to read on stdout.

use colored::Colorize;

pub fn say(message: &str) {
    println!("{message}");
}

/// Print `message`, highlighting the login it starts with.
pub fn say_about(login: &str, message: &str) {
    println!("{}", highlight_login(login, message));
}

fn highlight_login(login: &str, message: &str) -> String {
    match message.strip_prefix(login) {
        Some(rest) if !login.is_empty() => format!("{}{rest}", login.cyan().bold()),
        _ => message.to_string(),
    }
}
