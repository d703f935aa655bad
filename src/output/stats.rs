//! Run statistics
//!
//! This module computes the counts shown in the summary and prints them to
//! stdout at the end of a run.

use crate::harvest::{Mode, Outcome, SourceResult};
use crate::output::FlatItem;
use std::collections::HashMap;

/// A source that produced nothing, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLine {
    pub source_name: String,
    pub source_url: String,
    pub outcome: Outcome,
    pub error: Option<String>,
}

/// Counts describing a whole run
#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
    pub sources_attempted: usize,

    /// Sources with at least one item
    pub sources_ok: usize,

    /// Sources with no items
    pub sources_ko: usize,

    pub by_mode: HashMap<Mode, usize>,
    pub by_outcome: HashMap<Outcome, usize>,
    pub total_items: usize,

    /// Sources without items, in input order
    pub failures: Vec<FailureLine>,

    /// First few items, for a quick look
    pub sample: Vec<FlatItem>,
}

impl HarvestSummary {
    /// Computes the summary of settled results and their flattened items
    pub fn from_results(results: &[SourceResult], items: &[FlatItem], sample_size: usize) -> Self {
        let mut summary = Self {
            sources_attempted: results.len(),
            total_items: items.len(),
            sample: items.iter().take(sample_size).cloned().collect(),
            ..Self::default()
        };

        for result in results {
            let outcome = result.outcome();
            *summary.by_mode.entry(result.mode).or_insert(0) += 1;
            *summary.by_outcome.entry(outcome).or_insert(0) += 1;

            if result.has_items() {
                summary.sources_ok += 1;
            } else {
                summary.sources_ko += 1;
                summary.failures.push(FailureLine {
                    source_name: result.source_name.clone(),
                    source_url: result.source_url.clone(),
                    outcome,
                    error: result.error.clone(),
                });
            }
        }

        summary
    }

    pub fn mode_count(&self, mode: Mode) -> usize {
        self.by_mode.get(&mode).copied().unwrap_or(0)
    }

    pub fn outcome_count(&self, outcome: Outcome) -> usize {
        self.by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// Share of sources that produced items, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.sources_attempted == 0 {
            return 0.0;
        }
        (self.sources_ok as f64 / self.sources_attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &HarvestSummary) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Sources attempted: {}", summary.sources_attempted);
    println!("  OK (>=1 item): {} / KO: {}", summary.sources_ok, summary.sources_ko);
    println!("  Total items: {}", summary.total_items);
    println!();

    println!("Sources by Mode:");
    for mode in Mode::all() {
        println!("  {}: {}", mode, summary.mode_count(mode));
    }
    println!();

    println!("Sources by Outcome:");
    for outcome in Outcome::all() {
        let count = summary.outcome_count(outcome);
        if count > 0 {
            println!("  {}: {}", outcome.label(), count);
        }
    }
    println!();

    if !summary.failures.is_empty() {
        println!("Sources without items ({}):", summary.failures.len());
        for failure in &summary.failures {
            match &failure.error {
                Some(error) => println!("  - {} [{}]: {}", failure.source_name, failure.outcome, error),
                None => println!("  - {} [{}]", failure.source_name, failure.outcome),
            }
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} sources yielded items)",
        summary.success_rate(),
        summary.sources_ok,
        summary.sources_attempted
    );
}
