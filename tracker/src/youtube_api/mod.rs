//! A small YouTube Data API v3 client.
//!
//! Only the two read-only endpoints needed for channel discovery are covered:
//!
//! - `search.list`, to walk recently published videos page by page
//!   ([`YouTubeClient::search_recent_videos`]), and
//! - `channels.list`, to look up a channel's metadata by ID
//!   ([`YouTubeClient::list_channels_by_id`]).
//!
//! Both authenticate with an API key.

pub mod channels;
pub mod client;
pub mod search;
pub mod types;

// Re-export main types for convenience
pub use client::YouTubeClient;
pub use types::PageInfo;

pub use channels::{Channel, ChannelListResponse, ChannelSnippet, ChannelStatistics};
pub use search::{SearchListResponse, SearchResult, SearchResultId, SearchResultSnippet};
