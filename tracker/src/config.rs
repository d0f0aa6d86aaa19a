//! Run configuration.

use derive_builder::Builder;
use std::path::PathBuf;
use std::time::Duration;

/// File name of the channel table, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "new_youtube_channels.xlsx";

/// The largest page size `search.list` accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Everything that shapes a single tracker run.
///
/// Construct with [`TrackerConfig::builder`]; every field has a default, so
/// `TrackerConfig::builder().build()` gives the standard run.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TrackerConfig {
    /// Stop once this many qualifying channels have been committed.
    #[builder(default = 50)]
    pub target_count: usize,

    /// Only videos published within this many days are searched.
    #[builder(default = 90)]
    pub search_window_days: u32,

    /// Channels older than this many days are not recorded.
    #[builder(default = 180)]
    pub max_channel_age_days: u32,

    /// Results requested per search page.
    ///
    /// Must be between 1 and [`MAX_PAGE_SIZE`].
    #[builder(default = 50)]
    pub page_size: u32,

    /// Upper bound on search requests, retries included.
    #[builder(default = 100)]
    pub max_pages: usize,

    /// How many times in a row an empty page (or a page without a continuation token) is
    /// retried before giving up.
    #[builder(default = 3)]
    pub max_retries: usize,

    /// Wait before each retry.
    #[builder(default = "Duration::from_secs(5)")]
    pub retry_delay: Duration,

    /// Wait after each channel lookup.
    #[builder(default = "Duration::from_millis(500)")]
    pub throttle_delay: Duration,

    /// Region that search results are biased towards.
    #[builder(setter(into), default = "\"US\".to_string()")]
    pub region_code: String,

    /// Where the channel table is kept.
    #[builder(setter(into), default = "PathBuf::from(DEFAULT_OUTPUT)")]
    pub output_path: PathBuf,
}

impl TrackerConfig {
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }
}

impl TrackerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(page_size) = self.page_size
            && !(1..=MAX_PAGE_SIZE).contains(&page_size)
        {
            return Err(format!(
                "page size {page_size} is outside the allowed range [1, {MAX_PAGE_SIZE}]"
            ));
        }

        if self.target_count == Some(0) {
            return Err("target count must be at least 1".to_string());
        }

        if self.max_pages == Some(0) {
            return Err("page budget must be at least 1".to_string());
        }

        Ok(())
    }
}
