//! Configuration module for Feed-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file means all defaults.
//!
//! # Example
//!
//! ```no_run
//! use feed_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting with concurrency: {}", config.harvest.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, InputConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_file_hash, load_config, load_config_or_default};
pub use validation::validate;
