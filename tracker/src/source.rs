//! Where candidate channels come from.
//!
//! The tracker only needs two things from the outside world: pages of recently published videos,
//! and metadata for the channels that uploaded them. Both are expressed by [`ChannelSource`],
//! whose methods never fail. Transport errors and unusable responses are logged here and then
//! surface as an empty page or an absent channel, leaving the tracker to decide whether to
//! retry.

use crate::config::TrackerConfig;
use crate::record::ChannelRecord;
use crate::youtube_api::{SearchResult, YouTubeClient};
use jiff::{SignedDuration, Timestamp};
use std::future::Future;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<SearchResult>,
    /// Continuation token for the page after this one.
    pub next_page_token: Option<String>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Supplies search pages and channel metadata.
pub trait ChannelSource {
    /// Fetches the page identified by `page_token`, or the first page if there is none.
    ///
    /// A failed request yields an empty page without a continuation token, which looks exactly
    /// like a search that legitimately found nothing.
    fn search_page(&mut self, page_token: Option<&str>) -> impl Future<Output = SearchPage>;

    /// Looks up a channel's metadata.
    ///
    /// Yields `None` if the channel does not exist, its metadata is incomplete, or the request
    /// failed. Never retries.
    fn resolve_channel(&mut self, channel_id: &str)
    -> impl Future<Output = Option<ChannelRecord>>;
}

/// The earliest publish time that falls within a `window_days` trailing window ending at `now`.
pub fn search_window_start(now: Timestamp, window_days: u32) -> Timestamp {
    now.checked_sub(SignedDuration::from_hours(i64::from(window_days) * 24))
        .unwrap_or(Timestamp::MIN)
}

/// A [`ChannelSource`] backed by the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeSource {
    client: YouTubeClient,
    search_window_days: u32,
    page_size: u32,
    region_code: String,
}

impl YouTubeSource {
    pub fn new(client: YouTubeClient, config: &TrackerConfig) -> Self {
        Self {
            client,
            search_window_days: config.search_window_days,
            page_size: config.page_size,
            region_code: config.region_code.clone(),
        }
    }
}

impl ChannelSource for YouTubeSource {
    async fn search_page(&mut self, page_token: Option<&str>) -> SearchPage {
        let published_after = search_window_start(Timestamp::now(), self.search_window_days);
        tracing::info!(%published_after, page_token, "searching for recent videos");

        match self
            .client
            .search_recent_videos(
                published_after,
                self.page_size,
                &self.region_code,
                page_token,
            )
            .await
        {
            Ok(response) => {
                tracing::info!(videos = response.items.len(), "found recent videos");
                SearchPage {
                    items: response.items,
                    next_page_token: response.next_page_token,
                }
            }
            Err(e) => {
                tracing::error!(page_token, "search for recent videos failed: {e:#}");
                SearchPage::default()
            }
        }
    }

    async fn resolve_channel(&mut self, channel_id: &str) -> Option<ChannelRecord> {
        tracing::info!(channel_id, "fetching channel information");

        let response = match self.client.list_channels_by_id(channel_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(channel_id, "channel lookup failed: {e:#}");
                return None;
            }
        };

        let Some(channel) = response.items.into_iter().next() else {
            tracing::warn!(channel_id, "no channel information found");
            return None;
        };

        match ChannelRecord::from_api(channel) {
            Ok(record) => {
                tracing::info!(
                    channel_id,
                    title = %record.title,
                    created_at = %record.published_at,
                    "resolved channel"
                );
                Some(record)
            }
            Err(e) => {
                tracing::warn!(channel_id, "unusable channel information: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves the given `(status, body)` responses in order, one per connection, and records
    /// the head (request line and headers) of every request it sees.
    async fn canned_api(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                seen.lock().unwrap().push(String::from_utf8_lossy(&request).to_string());

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\n\
                    Content-Type: application/json\r\n\
                    Content-Length: {}\r\n\
                    Connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        (format!("http://{addr}/youtube/v3"), requests)
    }

    fn source(base_url: String) -> YouTubeSource {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = YouTubeClient::new("test-key", http).with_base_url(base_url);
        let config = TrackerConfig::builder().page_size(2).build().unwrap();
        YouTubeSource::new(client, &config)
    }

    #[test]
    fn window_start_is_exactly_n_days_back() {
        let now: Timestamp = "2026-10-19T00:00:00Z".parse().unwrap();
        let start = search_window_start(now, 90);
        assert_eq!(start, "2026-07-21T00:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[tokio::test]
    async fn search_page_passes_token_and_query() {
        let (base_url, requests) = canned_api(vec![(
            200,
            r#"{
                "items": [
                    { "id": { "kind": "youtube#video", "videoId": "v1" },
                      "snippet": { "channelId": "UCaaa", "title": "t" } }
                ],
                "nextPageToken": "NEXT"
            }"#,
        )])
        .await;
        let mut source = source(base_url);

        let page = source.search_page(Some("CURRENT")).await;

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].channel_id(), "UCaaa");
        assert_eq!(page.next_page_token.as_deref(), Some("NEXT"));

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /youtube/v3/search?"), "{request}");
        for param in [
            "part=snippet",
            "type=video",
            "order=date",
            "regionCode=US",
            "maxResults=2",
            "pageToken=CURRENT",
            "publishedAfter=",
        ] {
            assert!(request_line.contains(param), "{param} missing from {request}");
        }
        assert!(!request_line.contains("test-key"), "{request}");
        assert!(
            request
                .to_ascii_lowercase()
                .contains("x-goog-api-key: test-key"),
            "{request}"
        );
    }

    #[tokio::test]
    async fn failed_search_looks_like_an_empty_page() {
        let (base_url, _) = canned_api(vec![(
            403,
            r#"{ "error": { "code": 403, "message": "quota exceeded" } }"#,
        )])
        .await;
        let mut source = source(base_url);

        assert_eq!(source.search_page(None).await, SearchPage::default());
    }

    #[tokio::test]
    async fn resolve_channel_builds_record() {
        let (base_url, requests) = canned_api(vec![(
            200,
            r#"{
                "items": [
                    { "id": "UCaaa",
                      "snippet": { "title": "Channel A", "description": "d",
                                   "publishedAt": "2026-10-09T08:15:42Z" },
                      "statistics": { "subscriberCount": "1000" } }
                ]
            }"#,
        )])
        .await;
        let mut source = source(base_url);

        let record = source.resolve_channel("UCaaa").await.unwrap();

        assert_eq!(record.title, "Channel A");
        assert_eq!(record.subscriber_count, 1000);
        assert_eq!(record.url, "https://www.youtube.com/channel/UCaaa");
        let requests = requests.lock().unwrap();
        assert!(requests[0].starts_with("GET /youtube/v3/channels?"));
        assert!(requests[0].contains("part=snippet%2Cstatistics"));
        assert!(requests[0].contains("id=UCaaa"));
    }

    #[tokio::test]
    async fn resolve_channel_fails_soft() {
        let (base_url, _) = canned_api(vec![
            (200, r#"{ "items": [] }"#),
            (200, r#"{ "items": [ { "id": "UCbbb", "snippet": { "title": "B" } } ] }"#),
            (500, "backend error"),
        ])
        .await;
        let mut source = source(base_url);

        assert_eq!(source.resolve_channel("UCnope").await, None);
        assert_eq!(source.resolve_channel("UCbbb").await, None);
        assert_eq!(source.resolve_channel("UCccc").await, None);
    }
}
