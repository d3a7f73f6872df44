//! Pagination cursor echoed back to the infinite-scroll endpoint

use crate::config::{SourceConfig, CURSOR_DATE_FORMAT};
use crate::HarvestError;
use chrono::DateTime;
use std::fmt;

/// Server-dictated pagination position
///
/// The cursor only moves forward after a successful, non-empty page.
/// Malformed responses never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// 1-based page number sent as `page`
    pub page_index: u32,

    /// Oldest article date seen so far (`yyyy-MM-dd HH:mm:ss`), sent as `last_post_date`
    pub last_date: String,

    /// Opaque day token (`dd.MM.yy`) returned by the server and echoed as `currentday`
    pub current_day_token: String,
}

impl Cursor {
    /// The fixed starting cursor for a run
    pub fn initial(source: &SourceConfig) -> Self {
        Self {
            page_index: 1,
            last_date: source.initial_last_date.clone(),
            current_day_token: source.initial_current_day.clone(),
        }
    }

    /// Returns the cursor for the following page
    ///
    /// # Arguments
    ///
    /// * `oldest_datetime` - Raw `datetime` attribute of the page's last article
    /// * `next_day_token` - The `currentday` value from the same response
    ///
    /// # Returns
    ///
    /// * `Ok(Cursor)` - Cursor with the reformatted date and an incremented page index
    /// * `Err(HarvestError::InvalidCursor)` - The timestamp could not be parsed
    pub fn advance(&self, oldest_datetime: &str, next_day_token: &str) -> Result<Self, HarvestError> {
        Ok(Self {
            page_index: self.page_index + 1,
            last_date: format_cursor_date(oldest_datetime)?,
            current_day_token: next_day_token.to_string(),
        })
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} (last_post_date={}, currentday={})",
            self.page_index, self.last_date, self.current_day_token
        )
    }
}

/// Reformats an ISO-8601 offset timestamp into the cursor's storage format
///
/// The wall-clock time is kept in the timestamp's own offset, so
/// `2024-05-01T10:00:00+02:00` becomes `2024-05-01 10:00:00`.
pub fn format_cursor_date(raw: &str) -> Result<String, HarvestError> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim()).map_err(|e| HarvestError::InvalidCursor {
        value: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(parsed.format(CURSOR_DATE_FORMAT).to_string())
}
