//! Per-URL outcomes and run bookkeeping

use std::fmt;

/// Terminal outcome of processing one discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Already in the seen store; no page was opened
    SkippedSeen,
    /// Title, price or size missing
    SkippedIncomplete,
    /// Title contains a disqualifying term
    SkippedFiltered,
    /// Notification confirmed and URL recorded
    NotifiedCommitted,
    /// Notification (or the record after it) failed; URL left unrecorded
    NotifiedFailedNotCommitted,
    /// Page could not be opened, navigated or evaluated
    VisitFailed,
}

impl Outcome {
    /// Short tag used in log lines
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SkippedSeen => "seen",
            Self::SkippedIncomplete => "incomplete",
            Self::SkippedFiltered => "filtered",
            Self::NotifiedCommitted => "committed",
            Self::NotifiedFailedNotCommitted => "notify-failed",
            Self::VisitFailed => "visit-failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Transient state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    pub match_count: usize,
    pub first_match_sent: bool,
    pub max_matches: usize,
    outcomes: Vec<(String, Outcome)>,
}

impl RunState {
    #[must_use]
    pub fn new(max_matches: usize) -> Self {
        Self {
            match_count: 0,
            first_match_sent: false,
            max_matches,
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn quota_reached(&self) -> bool {
        self.match_count >= self.max_matches
    }

    pub fn record(&mut self, url: &str, outcome: Outcome) {
        if outcome == Outcome::NotifiedCommitted {
            self.match_count += 1;
        }
        self.outcomes.push((url.to_string(), outcome));
    }

    #[must_use]
    pub fn into_summary(self, discovered: usize) -> RunSummary {
        RunSummary {
            discovered,
            notified: self.match_count,
            outcomes: self.outcomes,
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs returned by discovery
    pub discovered: usize,
    /// Confirmed notifications (equals the committed count)
    pub notified: usize,
    /// Outcome per processed URL, in processing order
    pub outcomes: Vec<(String, Outcome)>,
}

impl RunSummary {
    /// Number of processed URLs that ended with `outcome`
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Outcome recorded for `url`, if it was processed
    #[must_use]
    pub fn outcome_of(&self, url: &str) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, o)| *o)
    }
}
