//! File sinks for the run report

use crate::config::OutputConfig;
use crate::output::markdown::format_summary_markdown;
use crate::output::traits::{OutputResult, ReportSink};
use crate::output::HarvestReport;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the pretty-printed `{scraped_at, count, items}` document
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonReportWriter {
    fn write_report(&self, report: &HarvestReport) -> OutputResult<()> {
        let mut writer = create_file(&self.path)?;
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("JSON report at {}", self.path.display())
    }
}

/// Writes one item per line
///
/// Every line, the last one included, ends with a newline. A run without
/// items leaves an empty file.
#[derive(Debug, Clone)]
pub struct NdjsonReportWriter {
    path: PathBuf,
}

impl NdjsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for NdjsonReportWriter {
    fn write_report(&self, report: &HarvestReport) -> OutputResult<()> {
        let mut writer = create_file(&self.path)?;
        for item in &report.items {
            serde_json::to_writer(&mut writer, item)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("NDJSON mirror at {}", self.path.display())
    }
}

/// Writes the markdown summary
#[derive(Debug, Clone)]
pub struct MarkdownSummaryWriter {
    path: PathBuf,
}

impl MarkdownSummaryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for MarkdownSummaryWriter {
    fn write_report(&self, report: &HarvestReport) -> OutputResult<()> {
        let markdown = format_summary_markdown(report);
        let mut writer = create_file(&self.path)?;
        writer.write_all(markdown.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("markdown summary at {}", self.path.display())
    }
}

/// Returns the three configured sinks: JSON, NDJSON, markdown
pub fn build_sinks(config: &OutputConfig) -> Vec<Box<dyn ReportSink>> {
    vec![
        Box::new(JsonReportWriter::new(&config.json_path)),
        Box::new(NdjsonReportWriter::new(&config.ndjson_path)),
        Box::new(MarkdownSummaryWriter::new(&config.summary_path)),
    ]
}

fn create_file(path: &Path) -> OutputResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
