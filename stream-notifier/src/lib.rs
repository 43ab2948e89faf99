pub mod config;
pub mod console;
pub mod lifecycle;
pub mod notification;
pub mod poller;
pub mod prompt;
pub mod quit;
pub mod services;
pub mod shutdown;
pub mod terminal;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use config::AppConfig;

/// Load `.env` and the runtime configuration. Errors here are fatal.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();
    let config = AppConfig::from_env()?;

    tracing::info!(
        base_dir = %config.base_dir.display(),
        check_interval = ?config.check_interval,
        streaming_interval = ?config.streaming_interval,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env"), PathBuf::from("../.env")];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        candidates.push(dir.join(".env"));
    }

    for path in &candidates {
        if dotenvy::from_path(path).is_ok() {
            tracing::info!("Loaded .env from: {}", path.display());
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
