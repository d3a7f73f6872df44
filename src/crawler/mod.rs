//! Crawler module for walking the infinite-scroll endpoint
//!
//! This module contains the core harvesting logic, including:
//! - Scroll request building and the HTTP transport
//! - Response decoding and rate-limit detection
//! - Article extraction from HTML fragments
//! - Linear backoff for malformed responses
//! - The fetch loop state machine

mod backoff;
mod coordinator;
mod decoder;
mod fetcher;
mod parser;

pub use backoff::{BackoffPolicy, RetryState};
pub use coordinator::{HarvestReport, Harvester};
pub use decoder::{decode_response, DecodeOutcome, ScrollPage};
pub use fetcher::{build_http_client, HttpTransport, ScrollRequest, ScrollTransport};
pub use parser::{oldest_datetime, parse_articles, query_all, query_first};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete harvest over HTTP
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client from the source configuration
/// 2. Start from the configured cursor
/// 3. Fetch, extract, merge and persist page by page
/// 4. Stop at the first termination reason
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(HarvestReport)` - The run reached a termination reason
/// * `Err(HarvestError)` - The run failed
pub async fn harvest(config: Config) -> Result<HarvestReport, HarvestError> {
    let transport = HttpTransport::from_config(&config.source)?;
    let mut harvester = Harvester::new(config, transport);
    harvester.run().await
}
