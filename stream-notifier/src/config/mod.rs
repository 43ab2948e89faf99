//! Configuration management: defaults, validation, loading from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("failed to resolve executable directory: {0}")]
    BaseDir(#[source] std::io::Error),
}
