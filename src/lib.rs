//! Feed-Harvest: newsletter source harvester
//!
//! This crate pulls recent content items from a list of websites. For each
//! site it discovers a syndication feed, parses its entries, and falls back
//! to headline extraction from the homepage when no feed yields anything.
//! Sources are harvested concurrently under a fixed bound with per-request
//! timeouts, and one misbehaving site never affects the others.

pub mod config;
pub mod harvest;
pub mod links;
pub mod output;
pub mod sources;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Feed-Harvest operations
///
/// Only these errors abort a run. Everything that goes wrong while
/// harvesting an individual source is recorded in its `SourceResult`.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Errors reading the source list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read source list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse source list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Source list {0} has no 'sources' array")]
    MissingSources(PathBuf),

    #[error("Source list {0} contains no sources")]
    Empty(PathBuf),
}

/// A failed HTTP fetch
///
/// Connection problems, timeouts and bad URLs all surface as this one
/// type; the message is meant for humans reading the summary.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("fetch failed for {url}: timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("fetch failed for {url}: {message}")]
    Network { url: String, message: String },

    #[error("fetch failed for {url}: invalid URL ({message})")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// Returns true if the request was cut off by its deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for Feed-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{run_harvest, Item, Mode, Outcome, SourceResult};
pub use sources::{load_sources, Source};
pub use state::SourceStage;
