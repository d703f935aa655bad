/// Stage definitions for the per-source harvest state machine
///
/// ```text
/// Start -> FetchHome -> HomeFail -> Done
///                    -> HomeOk -> DiscoverFeeds -> (FetchCandidate -> Parse)* -> Done
///                                                -> FallbackHtml -> Done
/// ```
use std::fmt;

/// Represents the current stage of a source in the harvest process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceStage {
    // ===== Active States =====
    /// Nothing has been requested yet
    Start,

    /// The homepage request is in flight
    FetchHome,

    /// The homepage answered with a 2xx status
    HomeOk,

    /// Feed candidates are being extracted from the homepage
    DiscoverFeeds,

    /// A feed candidate request is in flight
    FetchCandidate,

    /// A fetched candidate is being parsed
    Parse,

    /// No candidate produced items; extracting headlines from the homepage
    FallbackHtml,

    // ===== Terminal States =====
    /// The homepage could not be fetched
    HomeFail,

    /// The source has settled
    Done,
}

impl SourceStage {
    /// Returns true if a source in this stage may move to `next`
    pub fn can_transition_to(&self, next: SourceStage) -> bool {
        use SourceStage::*;
        matches!(
            (self, next),
            (Start, FetchHome)
                | (FetchHome, HomeOk)
                | (FetchHome, HomeFail)
                | (HomeFail, Done)
                | (HomeOk, DiscoverFeeds)
                | (DiscoverFeeds, FetchCandidate)
                | (DiscoverFeeds, FallbackHtml)
                | (FetchCandidate, Parse)
                | (FetchCandidate, FetchCandidate)
                | (FetchCandidate, FallbackHtml)
                | (Parse, Done)
                | (Parse, FetchCandidate)
                | (Parse, FallbackHtml)
                | (FallbackHtml, Done)
        )
    }

    /// Returns true if no further work happens for the source
    ///
    /// `HomeFail` is terminal for the work done, it only moves on to `Done`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::HomeFail | Self::Done)
    }

    /// Returns true if this stage waits on the network
    pub fn is_network_bound(&self) -> bool {
        matches!(self, Self::FetchHome | Self::FetchCandidate)
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchHome => "fetch_home",
            Self::HomeOk => "home_ok",
            Self::DiscoverFeeds => "discover_feeds",
            Self::FetchCandidate => "fetch_candidate",
            Self::Parse => "parse",
            Self::FallbackHtml => "fallback_html",
            Self::HomeFail => "home_fail",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SourceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Follows a single source through its stages
#[derive(Debug, Clone)]
pub struct StageTracker {
    source_id: String,
    history: Vec<SourceStage>,
}

impl StageTracker {
    /// Creates a tracker sitting in `Start`
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            history: vec![SourceStage::Start],
        }
    }

    /// Returns the current stage
    pub fn current(&self) -> SourceStage {
        self.history
            .last()
            .copied()
            .unwrap_or(SourceStage::Start)
    }

    /// Moves to `next`
    ///
    /// Illegal transitions are logged and still recorded so the history
    /// shows what actually happened.
    pub fn advance(&mut self, next: SourceStage) {
        let from = self.current();
        if from.can_transition_to(next) {
            tracing::trace!(source = %self.source_id, "{} -> {}", from, next);
        } else {
            tracing::warn!(
                source = %self.source_id,
                "Invalid stage transition: {} -> {}",
                from,
                next
            );
        }
        self.history.push(next);
    }

    /// All stages visited so far, starting with `Start`
    pub fn history(&self) -> &[SourceStage] {
        &self.history
    }
}
