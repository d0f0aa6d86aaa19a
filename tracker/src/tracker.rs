//! The discovery loop.
//!
//! A run walks search pages newest-first, looks up every channel it has not seen yet this run,
//! and records the ones that are young enough, until it has found enough of them or runs out of
//! pages, retries, or page budget.
//!
//! Nothing in a run is fatal. Failed searches and empty pages are retried a fixed number of times
//! with a fixed delay in between. Failed lookups are skipped. Failed writes are logged, still count
//! toward the target, and the run moves on to the next candidate.

use crate::config::TrackerConfig;
use crate::pacing::Pacer;
use crate::record::is_recent;
use crate::source::{ChannelSource, SearchPage};
use crate::table::{TableStore, merge_record};
use jiff::Timestamp;
use std::collections::HashSet;
use std::fmt;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The configured number of channels was recorded.
    TargetReached,
    /// The configured number of search requests was used up.
    PageBudgetExhausted,
    /// Searches kept coming back empty, or without a next page, after every retry.
    RetriesExhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::TargetReached => "target reached",
            Outcome::PageBudgetExhausted => "page budget exhausted",
            Outcome::RetriesExhausted => "no more results after retries",
        })
    }
}

/// What a run accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Channels recorded during this run.
    pub channels_found: usize,
    pub target: usize,
    /// Search requests made, retries included.
    pub pages_fetched: usize,
    /// Distinct channels looked up.
    pub channels_evaluated: usize,
    pub outcome: Outcome,
}

/// Drives a single discovery run.
#[derive(Debug)]
pub struct Tracker<S, T, P> {
    config: TrackerConfig,
    source: S,
    store: T,
    pacer: P,
}

impl<S, T, P> Tracker<S, T, P>
where
    S: ChannelSource,
    T: TableStore,
    P: Pacer,
{
    pub fn new(config: TrackerConfig, source: S, store: T, pacer: P) -> Self {
        Self {
            config,
            source,
            store,
            pacer,
        }
    }

    pub fn into_parts(self) -> (S, T, P) {
        (self.source, self.store, self.pacer)
    }

    /// Runs until enough channels are found or there is nothing more to look at.
    pub async fn run(&mut self) -> RunSummary {
        let target = self.config.target_count;
        let mut processed = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut channels_found = 0;
        let mut pages_fetched = 0;
        let mut retries = 0;

        let outcome = loop {
            if channels_found >= target {
                break Outcome::TargetReached;
            }
            if pages_fetched >= self.config.max_pages {
                tracing::warn!(pages_fetched, "page budget exhausted");
                break Outcome::PageBudgetExhausted;
            }

            pages_fetched += 1;
            tracing::info!(page = pages_fetched, "processing page");

            let page = self.source.search_page(page_token.as_deref()).await;
            if page.is_empty() {
                if self.retry(&mut retries, "no videos found").await {
                    continue;
                }
                tracing::warn!("no more videos found after retries");
                break Outcome::RetriesExhausted;
            }
            retries = 0;

            let SearchPage {
                items,
                next_page_token,
            } = page;
            for item in &items {
                let channel_id = item.channel_id();
                if channel_id.is_empty() {
                    tracing::warn!(
                        video_id = ?item.id.video_id,
                        "search result without a channel id"
                    );
                    continue;
                }
                if !processed.insert(channel_id.to_string()) {
                    tracing::debug!(channel_id, "skipping already processed channel");
                    continue;
                }

                if self.evaluate(channel_id).await {
                    channels_found += 1;
                    tracing::info!("found {channels_found}/{target} required channels");
                    if channels_found >= target {
                        break;
                    }
                }

                self.pacer.pause(self.config.throttle_delay).await;
            }

            if channels_found >= target {
                continue;
            }

            match next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    if self.retry(&mut retries, "no next page token").await {
                        continue;
                    }
                    tracing::info!("no more pages to process after retries");
                    break Outcome::RetriesExhausted;
                }
            }
        };

        RunSummary {
            channels_found,
            target,
            pages_fetched,
            channels_evaluated: processed.len(),
            outcome,
        }
    }

    /// Spends one retry, if any are left, and waits out the retry delay.
    ///
    /// Returns `false` once the retry budget is used up.
    async fn retry(&mut self, retries: &mut usize, why: &str) -> bool {
        if *retries >= self.config.max_retries {
            return false;
        }
        *retries += 1;
        tracing::warn!(
            attempt = *retries,
            max_retries = self.config.max_retries,
            "{why}, retrying"
        );
        self.pacer.pause(self.config.retry_delay).await;
        true
    }

    /// Looks up a channel and records it if it is recent enough.
    ///
    /// Returns whether the channel qualified. A qualifying channel counts even when writing the
    /// table fails; the failure is logged.
    async fn evaluate(&mut self, channel_id: &str) -> bool {
        let Some(record) = self.source.resolve_channel(channel_id).await else {
            return false;
        };

        if !is_recent(
            record.published_at,
            Timestamp::now(),
            self.config.max_channel_age_days,
        ) {
            tracing::info!(
                channel_id,
                title = %record.title,
                created_at = %record.published_at,
                "channel was created too long ago"
            );
            return false;
        }

        tracing::info!(channel_id, title = %record.title, "adding channel to results");
        match merge_record(&mut self.store, record) {
            Ok(rows) => {
                tracing::debug!(channel_id, rows, "channel table updated");
                true
            }
            Err(e) => {
                let cwd = std::env::current_dir()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|e| format!("<unknown: {e}>"));
                tracing::error!(
                    channel_id,
                    %cwd,
                    location = %self.store.location(),
                    "failed to update channel table: {e:#}"
                );
                true
            }
        }
    }
}
