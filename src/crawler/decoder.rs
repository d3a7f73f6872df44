//! Infinite-scroll response decoding
//!
//! The endpoint answers with a small JSON object. When the origin rate-limits
//! or blocks the client it serves an HTML error page instead, so any body that
//! does not decode as that object is reported as `Malformed`.

use serde::de::IgnoredAny;
use serde::Deserialize;

/// Raw payload returned by the infinite-scroll endpoint
#[derive(Debug, Deserialize)]
struct ScrollResponse {
    #[serde(rename = "type")]
    _kind: IgnoredAny,
    html: String,
    lastbatch: bool,
    currentday: String,
}

/// One successfully decoded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollPage {
    /// HTML fragment containing the article blocks
    pub html: String,

    /// Server flag marking the final batch
    pub is_last_batch: bool,

    /// Day token to echo back with the next request
    pub next_day_token: String,
}

/// Classification of a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Page(ScrollPage),

    /// The body is not the expected payload, usually a block page
    Malformed { reason: String },
}

/// Classifies a raw response body
///
/// # Example
///
/// ```
/// use scroll_harvest::crawler::{decode_response, DecodeOutcome};
///
/// let outcome = decode_response("<html>blocked</html>");
/// assert!(matches!(outcome, DecodeOutcome::Malformed { .. }));
/// ```
pub fn decode_response(body: &str) -> DecodeOutcome {
    if !body.trim_start().starts_with('{') {
        return DecodeOutcome::Malformed {
            reason: format!("body does not start with '{{': {}", preview(body)),
        };
    }

    match serde_json::from_str::<ScrollResponse>(body) {
        Ok(response) => DecodeOutcome::Page(ScrollPage {
            html: response.html,
            is_last_batch: response.lastbatch,
            next_day_token: response.currentday,
        }),
        Err(e) => DecodeOutcome::Malformed {
            reason: format!("undecodable payload: {}", e),
        },
    }
}

/// First characters of a body, for log lines
fn preview(body: &str) -> String {
    const MAX_CHARS: usize = 80;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
