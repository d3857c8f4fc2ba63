//! Recipe Dredger: sitemap-driven recipe discovery and import
//!
//! This crate walks the sitemaps of configured recipe sites, verifies that each
//! candidate page really carries a recipe, and imports new ones into Mealie
//! and/or Tandoor while suppressing duplicates already known to either service.

pub mod backend;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod supervisor;

use thiserror::Error;

/// Main error type for Recipe Dredger operations
#[derive(Debug, Error)]
pub enum DredgerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scraper is already running")]
    AlreadyRunning,

    #[error("Scraper is not running")]
    NotRunning,

    #[error("No sites to scrape")]
    NoSites,

    #[error("Please enable at least one service (Mealie or Tandoor)")]
    NoBackendEnabled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Recipe Dredger operations
pub type Result<T> = std::result::Result<T, DredgerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use backend::{ConnectionStatus, RecipeBackend};
pub use config::Config;
pub use output::RunReport;
pub use state::{RunPhase, RunStatus};
pub use supervisor::Supervisor;
