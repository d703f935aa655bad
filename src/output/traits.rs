//! Report sink trait and output errors
//!
//! A sink persists one finished [`HarvestReport`]; the harvest itself never
//! touches the filesystem.

use crate::output::HarvestReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report sinks
///
/// Implementations write the report somewhere durable. They must create
/// whatever parent directories they need.
pub trait ReportSink {
    /// Writes the full report
    fn write_report(&self, report: &HarvestReport) -> OutputResult<()>;

    /// Short human-readable destination, used in logs
    fn describe(&self) -> String;
}
