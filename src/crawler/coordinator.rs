//! Harvest coordinator - the fetch loop state machine
//!
//! This module drives a harvest run from the starting cursor to a
//! termination reason:
//! - Building and sending one scroll request at a time
//! - Backing off and retrying the same page on malformed responses
//! - Merging extracted articles and persisting the catalog after every page
//! - Deriving the next cursor from the page's oldest article

use crate::catalog::Catalog;
use crate::config::Config;
use crate::crawler::backoff::{BackoffPolicy, RetryState};
use crate::crawler::decoder::{decode_response, DecodeOutcome, ScrollPage};
use crate::crawler::fetcher::{ScrollRequest, ScrollTransport};
use crate::crawler::parser::{oldest_datetime, parse_articles};
use crate::state::{Cursor, HarvestState, TerminationReason};
use crate::HarvestError;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a finished harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// Why the run stopped
    pub reason: TerminationReason,

    /// Pages whose articles were merged into the catalog
    pub pages_processed: u32,

    /// Unique articles in the catalog
    pub total_articles: usize,

    /// Number of times the catalog was written
    pub persist_count: usize,

    /// Where the catalog was written
    pub output_path: PathBuf,
}

/// Owns the cursor, the catalog and the retry counter of one harvest run
pub struct Harvester<T: ScrollTransport> {
    config: Config,
    transport: T,
    catalog: Catalog,
    cursor: Cursor,
    retry: RetryState,
    backoff: BackoffPolicy,
    state: HarvestState,
    pages_processed: u32,
}

impl<T: ScrollTransport> Harvester<T> {
    /// Creates a harvester positioned at the configured starting cursor
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `transport` - Where scroll requests are sent
    pub fn new(config: Config, transport: T) -> Self {
        let catalog = Catalog::new(&config.output.catalog_path);
        let cursor = Cursor::initial(&config.source);
        let backoff = BackoffPolicy::from_config(&config.harvest);

        Self {
            config,
            transport,
            catalog,
            cursor,
            retry: RetryState::new(),
            backoff,
            state: HarvestState::Fetching,
            pages_processed: 0,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &HarvestState {
        &self.state
    }

    /// Runs the fetch loop until a termination reason is reached
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - The run reached a termination reason
    /// * `Err(HarvestError)` - Transport, persistence or retry-limit failure
    pub async fn run(&mut self) -> Result<HarvestReport, HarvestError> {
        tracing::info!("Starting harvest at {}", self.cursor);

        loop {
            let state = self.step().await?;
            if let Some(reason) = state.termination_reason() {
                let report = self.report(reason);
                if reason.is_expected() {
                    tracing::info!(
                        "Harvest finished: {} ({} articles)",
                        reason.describe(),
                        report.total_articles
                    );
                } else {
                    tracing::warn!(
                        "Harvest stopped early: {} at {} ({} articles kept)",
                        reason.describe(),
                        self.cursor,
                        report.total_articles
                    );
                }
                return Ok(report);
            }
        }
    }

    /// Performs a single state transition
    ///
    /// `Terminated` is absorbing: stepping it again changes nothing.
    pub async fn step(&mut self) -> Result<&HarvestState, HarvestError> {
        let current = std::mem::replace(&mut self.state, HarvestState::Fetching);

        let next = match current {
            HarvestState::Fetching => self.fetch().await?,

            HarvestState::RetryBackoff { delay, .. } => {
                tokio::time::sleep(delay).await;
                HarvestState::Fetching
            }

            HarvestState::Advancing(next) => {
                self.cursor = next;
                tokio::time::sleep(Duration::from_millis(self.config.harvest.page_delay_ms)).await;
                HarvestState::Fetching
            }

            terminated @ HarvestState::Terminated(_) => terminated,
        };

        self.state = next;
        Ok(&self.state)
    }

    /// Requests the page under the cursor and classifies the response
    async fn fetch(&mut self) -> Result<HarvestState, HarvestError> {
        let page_index = self.cursor.page_index;
        if page_index > self.config.harvest.max_pages {
            tracing::info!(
                "Page limit of {} reached, stopping",
                self.config.harvest.max_pages
            );
            return Ok(HarvestState::Terminated(TerminationReason::PageLimitReached));
        }

        let request = ScrollRequest::from_cursor(&self.cursor, &self.config.source);
        tracing::debug!("Requesting {}", self.cursor);
        let body = self.transport.send(&request).await?;

        match decode_response(&body) {
            DecodeOutcome::Malformed { reason } => {
                let Some(delay) = self.retry.record_failure(&self.backoff) else {
                    tracing::error!(
                        "Page {}: still malformed after {} attempts, giving up",
                        page_index,
                        self.retry.count()
                    );
                    return Err(HarvestError::RetriesExhausted {
                        page: page_index,
                        attempts: self.retry.count(),
                    });
                };

                tracing::warn!(
                    "Page {}: rate-limited, retry #{} in {}ms",
                    page_index,
                    self.retry.count(),
                    delay.as_millis()
                );
                tracing::debug!("Page {}: {}", page_index, reason);

                Ok(HarvestState::RetryBackoff {
                    attempt: self.retry.count(),
                    delay,
                })
            }

            DecodeOutcome::Page(page) => {
                self.retry.reset();
                self.process_page(page)
            }
        }
    }

    /// Merges a decoded page, persists the catalog and picks the next state
    fn process_page(&mut self, page: ScrollPage) -> Result<HarvestState, HarvestError> {
        let page_index = self.cursor.page_index;
        let articles = parse_articles(&page.html);

        if articles.is_empty() {
            tracing::info!("Page {}: empty, stopping", page_index);
            return Ok(HarvestState::Terminated(TerminationReason::EmptyPage));
        }

        let fetched = articles.len();
        let inserted = self.catalog.merge(articles);
        self.catalog.persist()?;
        self.pages_processed += 1;

        tracing::info!(
            "Page {}: {} articles (+{} new), total={}, lastbatch={}",
            page_index,
            fetched,
            inserted,
            self.catalog.len(),
            page.is_last_batch
        );

        match self.next_cursor(&page) {
            Err(e) => {
                tracing::warn!("Page {}: cannot advance cursor: {}", page_index, e);
                Ok(HarvestState::Terminated(
                    TerminationReason::CursorAdvanceFailed,
                ))
            }
            Ok(_) if page.is_last_batch => {
                tracing::info!("Page {}: last batch", page_index);
                Ok(HarvestState::Terminated(TerminationReason::LastBatch))
            }
            Ok(next) => Ok(HarvestState::Advancing(next)),
        }
    }

    fn next_cursor(&self, page: &ScrollPage) -> Result<Cursor, HarvestError> {
        let oldest = oldest_datetime(&page.html).ok_or(HarvestError::MissingEntryDate {
            page: self.cursor.page_index,
        })?;
        self.cursor.advance(&oldest, &page.next_day_token)
    }

    fn report(&self, reason: TerminationReason) -> HarvestReport {
        HarvestReport {
            reason,
            pages_processed: self.pages_processed,
            total_articles: self.catalog.len(),
            persist_count: self.catalog.persist_count(),
            output_path: self.catalog.path().to_path_buf(),
        }
    }
}
