//! Records produced while harvesting a source

use crate::sources::Source;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A content item extracted from a feed or a homepage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Headline with markup stripped and whitespace collapsed; never empty
    pub title: String,

    /// Absolute HTTP(S) link to the item
    pub url: Url,

    /// Publication date exactly as the feed wrote it
    pub date: Option<String>,
}

/// The extraction strategy that produced a source's items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Items came from an RSS or Atom feed
    Rss,
    /// Items came from headline extraction on the homepage
    Html,
    /// Nothing was extracted
    None,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Html => "html",
            Self::None => "none",
        }
    }

    pub fn all() -> [Mode; 3] {
        [Self::Rss, Self::Html, Self::None]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to a source, as an operator would ask about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A feed produced items
    Feed,
    /// No feed produced items but the homepage had headlines
    HtmlFallback,
    /// The homepage could not be fetched
    FetchFailed,
    /// Nothing that looked like a feed was found, and no headlines either
    NoFeedFound,
    /// At least one feed was read but had no usable entries, and no headlines either
    ParsedButEmpty,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::HtmlFallback => "html_fallback",
            Self::FetchFailed => "fetch_failed",
            Self::NoFeedFound => "no_feed_found",
            Self::ParsedButEmpty => "parsed_but_empty",
        }
    }

    /// Human-readable label used in the summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Feed => "RSS/Atom feed",
            Self::HtmlFallback => "HTML fallback",
            Self::FetchFailed => "Fetch failed",
            Self::NoFeedFound => "No feed found",
            Self::ParsedButEmpty => "Parsed but empty",
        }
    }

    pub fn all() -> [Outcome; 5] {
        [
            Self::Feed,
            Self::HtmlFallback,
            Self::FetchFailed,
            Self::NoFeedFound,
            Self::ParsedButEmpty,
        ]
    }

    /// Returns true if the source yielded at least one item
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Feed | Self::HtmlFallback)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The settled result of harvesting one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResult {
    pub source_id: String,
    pub source_name: String,
    pub source_url: String,

    /// Extracted items, at most the configured cap
    pub items: Vec<Item>,

    pub mode: Mode,

    /// HTTP status of the homepage, when it answered
    pub status: Option<u16>,

    /// Why the source failed, when it did
    pub error: Option<String>,

    /// Feed candidates requested
    pub candidates_tried: usize,

    /// Candidates that answered with something that looked like a feed
    pub feeds_parsed: usize,
}

impl SourceResult {
    /// A result for `source` with nothing extracted yet
    pub fn empty(source: &Source) -> Self {
        Self {
            source_id: source.id.clone(),
            source_name: source.name.clone(),
            source_url: source.url.clone(),
            items: Vec::new(),
            mode: Mode::None,
            status: None,
            error: None,
            candidates_tried: 0,
            feeds_parsed: 0,
        }
    }

    /// A result recording that `source` failed outright
    pub fn failed(source: &Source, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(source)
        }
    }

    /// Classifies the result for reporting
    pub fn outcome(&self) -> Outcome {
        match self.mode {
            Mode::Rss => Outcome::Feed,
            Mode::Html => Outcome::HtmlFallback,
            Mode::None if self.error.is_some() => Outcome::FetchFailed,
            Mode::None if self.feeds_parsed > 0 => Outcome::ParsedButEmpty,
            Mode::None => Outcome::NoFeedFound,
        }
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}
