/// Harvest state definitions for the fetch loop
///
/// This module defines the states the harvester moves through and the reasons
/// a run can end.
use crate::state::Cursor;
use std::fmt;
use std::time::Duration;

/// Why a harvest run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    // ===== Expected Endings =====
    /// A page decoded fine but contained no article blocks
    EmptyPage,

    /// The server flagged the page as the last batch
    LastBatch,

    /// The configured page ceiling was reached
    PageLimitReached,

    // ===== Unexpected Endings =====
    /// A non-empty page had no parseable date on its last article
    CursorAdvanceFailed,
}

impl TerminationReason {
    /// Returns true if the run ended the way a complete walk is expected to end
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::CursorAdvanceFailed)
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty_page",
            Self::LastBatch => "last_batch",
            Self::PageLimitReached => "page_limit_reached",
            Self::CursorAdvanceFailed => "cursor_advance_failed",
        }
    }

    /// Human-readable explanation used in the final summary
    pub fn describe(&self) -> &'static str {
        match self {
            Self::EmptyPage => "server returned a page without articles",
            Self::LastBatch => "server reported the last batch",
            Self::PageLimitReached => "page limit reached",
            Self::CursorAdvanceFailed => "could not derive the next cursor from the page",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current state of the fetch loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestState {
    /// About to request the page described by the current cursor
    Fetching,

    /// Waiting before retrying the same page after a malformed response
    RetryBackoff {
        /// Consecutive malformed responses for this page
        attempt: u32,
        /// How long to wait before the retry
        delay: Duration,
    },

    /// A page was processed; the next cursor is adopted after the politeness pause
    Advancing(Cursor),

    /// Final state, nothing follows
    Terminated(TerminationReason),
}

impl HarvestState {
    /// Returns the termination reason, if the loop has stopped
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        match self {
            Self::Terminated(reason) => Some(*reason),
            _ => None,
        }
    }
}
