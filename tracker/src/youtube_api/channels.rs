//! YouTube Channels API types.

use crate::youtube_api::types::PageInfo;
use serde::{Deserialize, Serialize};

/// Response structure for the `channels.list` API call.
///
/// Contains a list of [`Channel`] resources that match the request criteria,
/// along with pagination information in [`PageInfo`].
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#channelListResponse`.
    #[serde(default)]
    pub kind: String,
    /// A list of channels that match the request criteria.
    ///
    /// Looking up an ID that does not exist yields a response without `items` rather than an
    /// error status.
    #[serde(default)]
    pub items: Vec<Channel>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

/// A `channel` resource contains information about a YouTube channel.
///
/// Only the `snippet` and `statistics` parts are ever requested. Both are optional here, as is
/// every field inside them, so that an incomplete response still decodes and can be reported as
/// missing data rather than as a malformed body.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: String,
    /// Contains basic details about the channel.
    pub snippet: Option<ChannelSnippet>,
    /// Contains statistics for the channel.
    pub statistics: Option<ChannelStatistics>,
}

/// The snippet object contains basic details about the channel.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnippet {
    /// The channel's title.
    pub title: Option<String>,
    /// The channel's description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The date and time that the channel was created.
    ///
    /// The value is specified in ISO 8601 format. It is kept as a string so that a malformed
    /// value can be told apart from a missing one.
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

/// Statistics about the channel.
///
/// All counts are transmitted as decimal strings.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#statistics>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatistics {
    /// The number of times the channel has been viewed.
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    /// The number of subscribers that the channel has.
    ///
    /// Rounded down to three significant figures by the API.
    #[serde(rename = "subscriberCount")]
    pub subscriber_count: Option<String>,
    /// Indicates whether the channel's subscriber count is publicly visible.
    #[serde(rename = "hiddenSubscriberCount", default)]
    pub hidden_subscriber_count: bool,
    /// The number of public videos uploaded to the channel.
    #[serde(rename = "videoCount")]
    pub video_count: Option<String>,
}
