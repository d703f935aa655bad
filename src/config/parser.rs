use crate::config::types::Config;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The result is not validated. Command-line and environment overrides
/// may still replace any value, so callers run
/// [`validate`](crate::config::validate) once those are applied.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

/// Loads the configuration file if one was given, defaults otherwise
///
/// Like [`load_config`], this leaves validation to the caller.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Computes a SHA-256 hash of a file's content
///
/// Used to tell runs over different source lists apart in the summary.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(std::io::Error)` - Failed to read the file
pub fn compute_file_hash(path: &Path) -> Result<String, std::io::Error> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[harvest]
items-per-source = 3
timeout-ms = 5000
concurrency = 4

[user-agent]
client-name = "TestHarvester"
client-version = "1.0"
contact-url = "https://example.com/about"

[input]
sources-path = "./sources.json"

[output]
json-path = "./out/feeds.json"
ndjson-path = "./out/feeds.ndjson"
summary-path = "./out/summary.md"
sample-size = 5
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.harvest.items_per_source, 3);
        assert_eq!(config.harvest.timeout_ms, 5000);
        assert_eq!(config.harvest.concurrency, 4);
        assert_eq!(config.user_agent.client_name, "TestHarvester");
        assert_eq!(config.input.sources_path, "./sources.json");
        assert_eq!(config.output.sample_size, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = create_temp_config("[harvest]\nconcurrency = 2\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.harvest.concurrency, 2);
        assert_eq!(config.harvest.items_per_source, 5);
        assert_eq!(config.harvest.timeout_ms, 15_000);
        assert_eq!(config.output.json_path, "reports/feeds.json");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.harvest.concurrency, 6);
        assert_eq!(config.input.sources_path, "data/sources.json");
    }

    #[test]
    fn test_load_config_or_default_without_path() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.harvest.items_per_source, 5);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_file_value_fixed_by_override() {
        use crate::config::validate;

        let file = create_temp_config("[harvest]\nconcurrency = 0\n");
        let mut config = load_config(file.path()).unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.harvest.concurrency = 4;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_compute_file_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_file_hash(file.path()).unwrap();
        let hash2 = compute_file_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_file_hash(file1.path()).unwrap();
        let hash2 = compute_file_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
