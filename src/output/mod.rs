//! Output module for assembling and persisting run reports
//!
//! This module handles:
//! - Flattening per-source results into the run report
//! - Computing run statistics
//! - Selecting the newsletter preview
//! - Writing the JSON, NDJSON and markdown files

mod aggregate;
pub mod digest;
mod markdown;
pub mod stats;
mod traits;
mod writer;

pub use aggregate::{aggregate, FlatItem, HarvestReport};
pub use digest::{select_for_newsletter, NewsletterSection};
pub use markdown::format_summary_markdown;
pub use stats::{print_statistics, FailureLine, HarvestSummary};
pub use traits::{OutputError, OutputResult, ReportSink};
pub use writer::{build_sinks, JsonReportWriter, MarkdownSummaryWriter, NdjsonReportWriter};

/// Writes a report through every sink, stopping at the first failure
pub fn write_all(sinks: &[Box<dyn ReportSink>], report: &HarvestReport) -> OutputResult<()> {
    for sink in sinks {
        sink.write_report(report)?;
        tracing::info!("Wrote {}", sink.describe());
    }
    Ok(())
}
