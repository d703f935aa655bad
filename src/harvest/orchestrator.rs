//! Per-source harvesting
//!
//! One call to [`harvest_source`] takes a source from its homepage to a
//! settled [`SourceResult`]:
//! 1. Fetch the homepage; failure here is the only way a source fails
//! 2. Discover feed candidates in the homepage markup
//! 3. Try candidates in order until one yields items
//! 4. Otherwise extract headlines from the homepage
//!
//! Nothing in this module returns an error. Each stage has its own
//! classification function, and whatever goes wrong ends up in the result.

use crate::config::HarvestConfig;
use crate::harvest::discovery::discover_feeds;
use crate::harvest::fetcher::{fetch_text, FetchResult};
use crate::harvest::headlines::extract_headlines;
use crate::harvest::syndication::{looks_like_feed, parse_feed};
use crate::harvest::{Item, Mode, SourceResult};
use crate::links::parse_source_url;
use crate::sources::Source;
use crate::state::{SourceStage, StageTracker};
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Everything a source task needs, shared by all of them
#[derive(Debug, Clone)]
pub struct HarvestContext {
    pub client: Client,

    /// Deadline applied to each request on its own
    pub timeout: Duration,

    /// Maximum items kept per source
    pub items_per_source: usize,
}

impl HarvestContext {
    pub fn new(client: Client, config: &HarvestConfig) -> Self {
        Self {
            client,
            timeout: config.timeout(),
            items_per_source: config.items_per_source,
        }
    }
}

/// Why a homepage could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeFailure {
    /// Status code, when the server answered
    pub status: Option<u16>,
    pub message: String,
}

/// What came of trying one feed candidate
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    /// Parsed as a feed with at least one item
    Items(Vec<Item>),
    /// The request never produced a response
    FetchFailed(FetchError),
    /// The server answered with a non-2xx status
    HttpStatus(u16),
    /// The response was neither typed nor shaped like a feed
    NotAFeed,
    /// Parsed as a feed but nothing usable came out
    Empty,
}

impl CandidateOutcome {
    /// True when the candidate body went through the feed parser
    pub fn was_parsed(&self) -> bool {
        matches!(self, Self::Items(_) | Self::Empty)
    }
}

/// Decides whether a homepage fetch can be used
pub fn classify_home(fetched: Result<FetchResult, FetchError>) -> Result<FetchResult, HomeFailure> {
    match fetched {
        Ok(page) if page.ok => Ok(page),
        Ok(page) => Err(HomeFailure {
            status: Some(page.status),
            message: format!("HTTP {} on homepage", page.status),
        }),
        Err(e) => Err(HomeFailure {
            status: None,
            message: e.to_string(),
        }),
    }
}

/// Fetches and parses one feed candidate
pub async fn try_candidate(context: &HarvestContext, candidate: &Url) -> CandidateOutcome {
    let fetched = match fetch_text(&context.client, candidate.as_str(), context.timeout).await {
        Ok(fetched) => fetched,
        Err(e) => return CandidateOutcome::FetchFailed(e),
    };

    if !fetched.ok {
        return CandidateOutcome::HttpStatus(fetched.status);
    }

    if !looks_like_feed(&fetched.content_type, &fetched.body) {
        return CandidateOutcome::NotAFeed;
    }

    let items = parse_feed(&fetched.body, &fetched.final_url, context.items_per_source);
    if items.is_empty() {
        CandidateOutcome::Empty
    } else {
        CandidateOutcome::Items(items)
    }
}

/// Harvests a single source
///
/// Always returns a settled result. Timeouts, refused connections and
/// broken markup are recorded in it rather than returned.
pub async fn harvest_source(context: &HarvestContext, source: &Source) -> SourceResult {
    let span = tracing::info_span!("source", source = %source.id);
    run_stages(context, source).instrument(span).await
}

async fn run_stages(context: &HarvestContext, source: &Source) -> SourceResult {
    let mut result = SourceResult::empty(source);
    let mut tracker = StageTracker::new(source.id.as_str());

    tracker.advance(SourceStage::FetchHome);
    let fetched = match parse_source_url(&source.url) {
        Ok(url) => fetch_text(&context.client, url.as_str(), context.timeout).await,
        Err(message) => Err(FetchError::InvalidUrl {
            url: source.url.clone(),
            message,
        }),
    };

    let home = match classify_home(fetched) {
        Ok(home) => home,
        Err(failure) => {
            tracker.advance(SourceStage::HomeFail);
            tracing::warn!("{} failed: {}", source.name, failure.message);
            result.status = failure.status;
            result.error = Some(failure.message);
            tracker.advance(SourceStage::Done);
            return result;
        }
    };

    tracker.advance(SourceStage::HomeOk);
    result.status = Some(home.status);

    tracker.advance(SourceStage::DiscoverFeeds);
    let candidates = discover_feeds(&home.body, &home.final_url);
    tracing::debug!("{} feed candidates", candidates.len());

    for candidate in &candidates {
        tracker.advance(SourceStage::FetchCandidate);
        result.candidates_tried += 1;

        let outcome = try_candidate(context, candidate).await;
        if outcome.was_parsed() {
            tracker.advance(SourceStage::Parse);
            result.feeds_parsed += 1;
        }

        match outcome {
            CandidateOutcome::Items(items) => {
                tracing::info!("{}: {} items from {}", source.name, items.len(), candidate);
                result.items = items;
                result.mode = Mode::Rss;
                tracker.advance(SourceStage::Done);
                return result;
            }
            CandidateOutcome::FetchFailed(e) => tracing::debug!("Skipping candidate: {}", e),
            CandidateOutcome::HttpStatus(status) => {
                tracing::debug!("Skipping candidate {}: HTTP {}", candidate, status)
            }
            CandidateOutcome::NotAFeed => tracing::debug!("Skipping candidate {}: not a feed", candidate),
            CandidateOutcome::Empty => tracing::debug!("Skipping candidate {}: no usable entries", candidate),
        }
    }

    tracker.advance(SourceStage::FallbackHtml);
    let items = extract_headlines(&home.body, &home.final_url, context.items_per_source);
    if items.is_empty() {
        tracing::info!("{}: nothing extracted", source.name);
    } else {
        tracing::info!("{}: {} headlines from homepage", source.name, items.len());
        result.mode = Mode::Html;
        result.items = items;
    }
    tracker.advance(SourceStage::Done);

    result
}
