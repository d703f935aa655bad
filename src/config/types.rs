use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Feed-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Harvesting behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Maximum number of items kept per source
    #[serde(rename = "items-per-source")]
    pub items_per_source: usize,

    /// Deadline for each individual HTTP request (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Maximum number of sources harvested at the same time
    pub concurrency: usize,
}

impl HarvestConfig {
    /// Returns the per-request deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            items_per_source: 5,
            timeout_ms: 15_000,
            concurrency: 6,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `ClientName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.client_name, self.client_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "feed-harvest".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/feed-harvest/feed-harvest".to_string(),
        }
    }
}

/// Source list location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the JSON source list
    #[serde(rename = "sources-path")]
    pub sources_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sources_path: "data/sources.json".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON report
    #[serde(rename = "json-path")]
    pub json_path: String,

    /// Path to the line-delimited mirror of the report items
    #[serde(rename = "ndjson-path")]
    pub ndjson_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Number of sample items listed in the summary
    #[serde(rename = "sample-size")]
    pub sample_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: "reports/feeds.json".to_string(),
            ndjson_path: "reports/feeds.ndjson".to_string(),
            summary_path: "reports/feeds_summary.md".to_string(),
            sample_size: 10,
        }
    }
}
