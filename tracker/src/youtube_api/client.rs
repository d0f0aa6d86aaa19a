//! Core YouTube API client functionality.

use crate::config::MAX_PAGE_SIZE;
use crate::youtube_api::{channels::ChannelListResponse, search::SearchListResponse};
use eyre::Context;
use jiff::Timestamp;
use tracing::instrument;

/// Header that carries the API key.
const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Where the YouTube Data API v3 lives.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Client for interacting with the YouTube Data API v3.
///
/// All calls made by this client only read public data, so the client authenticates with a plain
/// API key rather than an OAuth token. The key travels in the `X-Goog-Api-Key` header, never in
/// the URL, and URLs are stripped from transport errors, so it does not end up in logs.
#[derive(Clone)]
pub struct YouTubeClient {
    /// Developer key for the YouTube Data API.
    api_key: String,
    /// Base URL that endpoint paths are appended to.
    base_url: String,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a new YouTube API client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - A YouTube Data API v3 developer key
    /// * `client` - Shared HTTP client for making API requests
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Points the client at a different API root, such as a local stand-in for the real API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Makes a keyed `GET` request to the YouTube API with common error handling.
    ///
    /// This method consolidates the shared logic across all YouTube API requests:
    /// - API key header
    /// - Query parameters
    /// - Status code validation and error handling
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API resource path, such as `search`
    /// * `query_params` - Query parameters for the request
    ///
    /// # Returns
    ///
    /// The raw [`reqwest::Response`] for method-specific JSON parsing.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn make_api_request(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> eyre::Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query_params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send GET request to YouTube API: {}", url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                endpoint,
                status_code,
                error_text
            ));
        }

        Ok(response)
    }

    /// Searches for videos published after the given point in time, newest first.
    ///
    /// Uses the `search.list` API with an empty query, restricted to videos, so that the results
    /// are simply "whatever was uploaded recently in this region". Each result carries the ID of
    /// the channel that uploaded it.
    ///
    /// # Arguments
    ///
    /// * `published_after` - Only videos published at or after this instant are returned
    /// * `max_results` - Page size; clamped to the 1-50 range the API accepts
    /// * `region_code` - ISO 3166-1 alpha-2 country code to bias results towards
    /// * `page_token` - Continuation token from a previous page, or `None` for the first page
    ///
    /// # Returns
    ///
    /// A [`SearchListResponse`] with up to `max_results` items and, if there are more, a token
    /// for the next page.
    ///
    /// # API Cost
    ///
    /// This operation costs 100 quota units per call.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_recent_videos(
        &self,
        published_after: Timestamp,
        max_results: u32,
        region_code: &str,
        page_token: Option<&str>,
    ) -> eyre::Result<SearchListResponse> {
        let published_after = published_after.strftime("%Y-%m-%dT%H:%M:%SZ").to_string();
        let max_results_string = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut query_params = vec![
            ("part", "snippet"),
            ("q", ""),
            ("type", "video"),
            ("order", "date"),
            ("regionCode", region_code),
            ("publishedAfter", published_after.as_str()),
            ("maxResults", max_results_string.as_str()),
        ];

        // Add pageToken if provided
        if let Some(token) = page_token {
            query_params.push(("pageToken", token));
        }

        let response = self.make_api_request("search", &query_params).await?;

        let results: SearchListResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("parse YouTube search API response as JSON")?;

        tracing::debug!(
            total_results = results.page_info.total_results,
            returned_items = results.items.len(),
            has_next_page = results.next_page_token.is_some(),
            "fetched search results"
        );

        Ok(results)
    }

    /// Looks up a single channel by its ID.
    ///
    /// Uses the `channels.list` API with the `snippet` and `statistics` parts, which together
    /// hold the title, description, creation time, and subscriber count.
    ///
    /// An unknown channel ID is not an error at this level: the API answers with an empty
    /// `items` list, and so does this method.
    ///
    /// # API Cost
    ///
    /// This operation costs 1 quota unit per call.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self))]
    pub async fn list_channels_by_id(&self, channel_id: &str) -> eyre::Result<ChannelListResponse> {
        let query_params = [("part", "snippet,statistics"), ("id", channel_id)];

        let response = self.make_api_request("channels", &query_params).await?;

        let channels: ChannelListResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("parse YouTube channels API response as JSON")?;

        tracing::debug!(
            channel_id,
            returned_items = channels.items.len(),
            "fetched channel by ID"
        );

        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_api_key() {
        let client = YouTubeClient::new("very-secret", reqwest::Client::new());
        let debug = format!("{client:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains(DEFAULT_BASE_URL));
    }

    #[tokio::test]
    async fn transport_errors_do_not_reveal_api_key() {
        // grab a free port and close it again so nothing is listening there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = YouTubeClient::new("SECRET-API-KEY", http)
            .with_base_url(format!("http://{addr}/youtube/v3"));

        let err = client
            .search_recent_videos(Timestamp::now(), 5, "US", Some("PAGE"))
            .await
            .unwrap_err();
        let report = format!("{err:#}");
        assert!(!report.contains("SECRET-API-KEY"), "{report}");
        assert!(report.contains("search"), "{report}");

        let err = client.list_channels_by_id("UCaaa").await.unwrap_err();
        let report = format!("{err:#} {err:?}");
        assert!(!report.contains("SECRET-API-KEY"), "{report}");
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = YouTubeClient::new("k", reqwest::Client::new())
            .with_base_url("http://127.0.0.1:8080/youtube/v3/");
        assert_eq!(client.base_url, "http://127.0.0.1:8080/youtube/v3");
    }
}
