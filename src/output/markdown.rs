//! Markdown summary generation
//!
//! This module renders the human-readable run summary: OK/KO counts,
//! mode and outcome breakdowns, failing sources, sample items and the
//! newsletter preview.

use crate::harvest::{Mode, Outcome};
use crate::output::digest::{select_for_newsletter, DEFAULT_MAX_PER_SOURCE, DEFAULT_MAX_SOURCES};
use crate::output::HarvestReport;

/// Formats a run report as markdown
pub fn format_summary_markdown(report: &HarvestReport) -> String {
    let summary = &report.summary;
    let mut md = String::new();

    md.push_str("# Feed Harvest Summary\n\n");

    md.push_str(&format!("- **Scraped at**: {}\n", report.scraped_at.to_rfc3339()));
    if let Some(digest) = &report.sources_digest {
        md.push_str(&format!("- **Source list SHA-256**: {}\n", digest));
    }
    md.push_str(&format!("- **Sources**: {}\n", summary.sources_attempted));
    md.push_str(&format!(
        "- **OK (≥1 item)**: {} / **KO**: {}\n",
        summary.sources_ok, summary.sources_ko
    ));
    md.push_str(&format!(
        "- **Mode RSS/Atom**: {} | **Fallback HTML**: {}\n",
        summary.mode_count(Mode::Rss),
        summary.mode_count(Mode::Html)
    ));
    md.push_str(&format!("- **Total items**: {}\n\n", summary.total_items));

    md.push_str("## Outcomes\n\n");
    md.push_str("| Outcome | Sources |\n");
    md.push_str("|---------|---------|\n");
    for outcome in Outcome::all() {
        md.push_str(&format!("| {} | {} |\n", outcome.label(), summary.outcome_count(outcome)));
    }
    md.push('\n');

    if !summary.failures.is_empty() {
        md.push_str("## Sources Without Items\n\n");
        md.push_str("| Source | Outcome | Error |\n");
        md.push_str("|--------|---------|-------|\n");
        for failure in &summary.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&failure.source_name),
                failure.outcome,
                escape_cell(failure.error.as_deref().unwrap_or("-"))
            ));
        }
        md.push('\n');
    }

    md.push_str("## Sample Items\n\n");
    if summary.sample.is_empty() {
        md.push_str("(no items extracted)\n");
    } else {
        for item in &summary.sample {
            md.push_str(&format!("- {}: {} → {}\n", item.source_name, item.title, item.url));
        }
    }
    md.push('\n');

    md.push_str("## Newsletter Preview\n\n");
    let sections = select_for_newsletter(&report.items, DEFAULT_MAX_SOURCES, DEFAULT_MAX_PER_SOURCE);
    if sections.is_empty() {
        md.push_str("No news this edition.\n");
    } else {
        for section in sections {
            md.push_str(&format!("### {}\n\n", section.source_name));
            for item in &section.items {
                match &item.date {
                    Some(date) => md.push_str(&format!("- [{}]({}) · {}\n", item.title, item.url, date)),
                    None => md.push_str(&format!("- [{}]({})\n", item.title, item.url)),
                }
            }
            md.push('\n');
        }
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
