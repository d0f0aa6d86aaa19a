//! YouTube Search API types.

use crate::youtube_api::types::PageInfo;
use serde::{Deserialize, Serialize};

/// Response structure for the `search.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#searchListResponse`.
    #[serde(default)]
    pub kind: String,
    /// A list of results that match the search criteria.
    ///
    /// The API omits this field entirely when nothing matched.
    #[serde(default)]
    pub items: Vec<SearchResult>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A search result contains information about a YouTube video, channel, or playlist that
/// matches the search parameters.
///
/// We only ever search with `type=video`, so every result is a video, and the interesting bit
/// is which channel published it.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifies the resource that matched the search request.
    #[serde(default)]
    pub id: SearchResultId,
    #[serde(default)]
    pub snippet: SearchResultSnippet,
}

impl SearchResult {
    /// The ID of the channel that published the matched resource.
    ///
    /// Empty if the API left it out.
    pub fn channel_id(&self) -> &str {
        &self.snippet.channel_id
    }
}

/// The `id` object of a search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultId {
    /// The type of the API resource, e.g. `youtube#video`.
    #[serde(default)]
    pub kind: String,
    /// Set only when the resource is a video.
    #[serde(rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Basic details about a search result.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#snippet>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSnippet {
    /// The ID of the channel that published the resource.
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    /// The title of the search result.
    #[serde(default)]
    pub title: String,
    /// The title of the channel that published the resource.
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    /// The creation date and time of the resource, in ISO 8601 format.
    ///
    /// Kept as a string since we never look at it beyond logging.
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
}
