//! Channel records and the recency filter.

use crate::youtube_api::Channel;
use eyre::Context;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// A channel that has been looked up, in the shape it is persisted in.
///
/// Field order matches the column order of the persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    /// When the channel was created.
    pub published_at: Timestamp,
    pub subscriber_count: u64,
    pub url: String,
}

impl ChannelRecord {
    /// Column names of the persisted table, in order.
    pub const COLUMNS: [&'static str; 6] = [
        "channel_id",
        "title",
        "description",
        "published_at",
        "subscriber_count",
        "url",
    ];

    /// The public page of the channel with the given ID.
    pub fn url_for(channel_id: &str) -> String {
        format!("https://www.youtube.com/channel/{channel_id}")
    }

    /// Extracts a record from a `channels.list` resource.
    ///
    /// Fails if the title, creation time, or subscriber count is absent or cannot be parsed. A
    /// missing description is taken to be empty.
    pub fn from_api(channel: Channel) -> eyre::Result<Self> {
        let Channel {
            id,
            snippet,
            statistics,
        } = channel;

        let snippet = snippet.ok_or_else(|| eyre::eyre!("channel {id} has no snippet"))?;
        let title = snippet
            .title
            .ok_or_else(|| eyre::eyre!("channel {id} has no snippet.title"))?;
        let published_at = snippet
            .published_at
            .ok_or_else(|| eyre::eyre!("channel {id} has no snippet.publishedAt"))?;
        let published_at = parse_published_at(&published_at)
            .with_context(|| format!("creation time of channel {id}"))?;

        let statistics =
            statistics.ok_or_else(|| eyre::eyre!("channel {id} has no statistics"))?;
        let subscriber_count = statistics
            .subscriber_count
            .ok_or_else(|| eyre::eyre!("channel {id} has no statistics.subscriberCount"))?;
        let subscriber_count = subscriber_count
            .parse::<u64>()
            .with_context(|| format!("parse subscriber count {subscriber_count:?} of channel {id}"))?;

        Ok(Self {
            url: Self::url_for(&id),
            channel_id: id,
            title,
            description: snippet.description.unwrap_or_default(),
            published_at,
            subscriber_count,
        })
    }
}

/// Parses an API timestamp such as `2026-10-09T08:15:42Z` or `2026-10-09T08:15:42.123456Z`.
pub fn parse_published_at(value: &str) -> eyre::Result<Timestamp> {
    value
        .parse::<Timestamp>()
        .with_context(|| format!("parse timestamp {value:?}"))
}

/// Whether something created at `created_at` is at most `max_age_days` old as of `now`.
///
/// The boundary is inclusive: exactly `max_age_days` old still counts as recent.
pub fn is_recent(created_at: Timestamp, now: Timestamp, max_age_days: u32) -> bool {
    let max_age = SignedDuration::from_hours(i64::from(max_age_days) * 24);
    match now.checked_sub(max_age) {
        Ok(cutoff) => created_at >= cutoff,
        // the cutoff predates the representable range, so nothing can be older than it
        Err(_) => true,
    }
}
