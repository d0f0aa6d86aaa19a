//! Test doubles for the tracker's collaborators.

use crate::pacing::Pacer;
use crate::record::ChannelRecord;
use crate::source::{ChannelSource, SearchPage};
use crate::table::TableStore;
use crate::youtube_api::{SearchResult, SearchResultId, SearchResultSnippet};
use jiff::{SignedDuration, Timestamp};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A channel record created `age_days` ago.
pub(crate) fn channel(id: &str, age_days: i64, subscriber_count: u64) -> ChannelRecord {
    ChannelRecord {
        channel_id: id.to_string(),
        title: format!("Channel {id}"),
        description: format!("all about {id}"),
        published_at: Timestamp::now() - SignedDuration::from_hours(age_days * 24),
        subscriber_count,
        url: ChannelRecord::url_for(id),
    }
}

/// A search page listing one video per given channel.
pub(crate) fn page(channel_ids: &[&str], next_page_token: Option<&str>) -> SearchPage {
    SearchPage {
        items: channel_ids
            .iter()
            .enumerate()
            .map(|(i, id)| SearchResult {
                id: SearchResultId {
                    kind: "youtube#video".to_string(),
                    video_id: Some(format!("{id}-video-{i}")),
                },
                snippet: SearchResultSnippet {
                    channel_id: id.to_string(),
                    title: format!("upload by {id}"),
                    channel_title: format!("Channel {id}"),
                    published_at: "2026-10-18T12:00:00Z".to_string(),
                },
            })
            .collect(),
        next_page_token: next_page_token.map(str::to_string),
    }
}

/// Hands out pre-arranged search pages in order and records every call.
///
/// Once the scripted pages run out, every further search returns `fallback`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    pub pages: VecDeque<SearchPage>,
    pub fallback: SearchPage,
    pub channels: HashMap<String, ChannelRecord>,
    pub searches: Vec<Option<String>>,
    pub lookups: Vec<String>,
}

impl ScriptedSource {
    pub fn new(pages: impl IntoIterator<Item = SearchPage>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_channel(mut self, record: ChannelRecord) -> Self {
        self.channels.insert(record.channel_id.clone(), record);
        self
    }
}

impl ChannelSource for ScriptedSource {
    async fn search_page(&mut self, page_token: Option<&str>) -> SearchPage {
        self.searches.push(page_token.map(str::to_string));
        self.pages
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    async fn resolve_channel(&mut self, channel_id: &str) -> Option<ChannelRecord> {
        self.lookups.push(channel_id.to_string());
        self.channels.get(channel_id).cloned()
    }
}

/// Remembers every pause instead of waiting.
#[derive(Debug, Default)]
pub(crate) struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    async fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

/// In-memory table that can be made unreadable or unwritable.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub rows: Vec<ChannelRecord>,
    pub unreadable: bool,
    pub unwritable: bool,
    pub saves: usize,
}

impl TableStore for MemoryStore {
    fn load(&self) -> eyre::Result<Vec<ChannelRecord>> {
        if self.unreadable {
            eyre::bail!("garbled table");
        }
        Ok(self.rows.clone())
    }

    fn save(&mut self, rows: &[ChannelRecord]) -> eyre::Result<()> {
        if self.unwritable {
            eyre::bail!("disk full");
        }
        self.rows = rows.to_vec();
        self.unreadable = false;
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
