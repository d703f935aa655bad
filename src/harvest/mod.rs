//! Harvest module for discovering feeds and extracting items
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching under per-request deadlines
//! - Feed discovery and RSS/Atom parsing
//! - Headline extraction when no feed works
//! - Bounded concurrent scheduling of sources

mod discovery;
mod fetcher;
mod headlines;
mod orchestrator;
mod scheduler;
mod syndication;
mod text;
mod types;

pub use discovery::{discover_feeds, CONVENTIONAL_FEED_PATHS};
pub use fetcher::{build_http_client, fetch_text, FetchResult};
pub use headlines::extract_headlines;
pub use orchestrator::{
    classify_home, harvest_source, try_candidate, CandidateOutcome, HarvestContext, HomeFailure,
};
pub use scheduler::{Scheduler, TaskFailure, DEFAULT_CONCURRENCY};
pub use syndication::{detect_format, looks_like_feed, parse_feed, FeedFormat};
pub use types::{Item, Mode, Outcome, SourceResult};

use crate::config::Config;
use crate::sources::Source;
use crate::HarvestError;
use std::sync::Arc;

/// Harvests every source and returns one result per source, in input order
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client
/// 2. Start one task per source, at most `harvest.concurrency` at a time
/// 3. Wait for every task to settle
///
/// A task that dies without producing a result is reported as a failed
/// source; it never takes the run down.
///
/// # Errors
///
/// Only a client that cannot be built fails the run.
pub async fn run_harvest(
    config: &Config,
    sources: Vec<Source>,
) -> Result<Vec<SourceResult>, HarvestError> {
    let client = build_http_client(&config.user_agent)?;
    let context = Arc::new(HarvestContext::new(client, &config.harvest));
    let scheduler = Scheduler::new(config.harvest.concurrency);

    tracing::info!(
        "Harvesting {} sources ({} at a time, {}ms per request)",
        sources.len(),
        scheduler.limit(),
        config.harvest.timeout_ms
    );

    let roster = sources.clone();
    let slots = scheduler
        .run_all(sources, move |source: Source| {
            let context = Arc::clone(&context);
            async move { harvest_source(&context, &source).await }
        })
        .await;

    let results = slots
        .into_iter()
        .zip(roster.iter())
        .map(|(slot, source)| {
            slot.unwrap_or_else(|failure| {
                tracing::error!("Source {} did not settle: {}", source.id, failure);
                SourceResult::failed(source, failure.to_string())
            })
        })
        .collect();

    Ok(results)
}
