use clap::Parser;
use eyre::Context;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_growth_tracker::config::{DEFAULT_OUTPUT, TrackerConfig};
use youtube_growth_tracker::pacing::TokioPacer;
use youtube_growth_tracker::source::YouTubeSource;
use youtube_growth_tracker::table::XlsxTableStore;
use youtube_growth_tracker::tracker::Tracker;
use youtube_growth_tracker::youtube_api::YouTubeClient;

/// Discover recently created YouTube channels and record them in a spreadsheet.
#[derive(Parser)]
#[command(name = "youtube-growth-tracker", version, about)]
struct Cli {
    /// YouTube Data API v3 key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Stop after recording this many new channels.
    #[arg(long, env = "TRACKER_TARGET_COUNT", default_value_t = 50)]
    target_count: usize,

    /// Search videos published within this many days.
    #[arg(long, env = "TRACKER_SEARCH_WINDOW_DAYS", default_value_t = 90)]
    search_window_days: u32,

    /// Only record channels created within this many days.
    #[arg(long, env = "TRACKER_MAX_CHANNEL_AGE_DAYS", default_value_t = 180)]
    max_channel_age_days: u32,

    /// Search results per page (at most 50).
    #[arg(long, env = "TRACKER_PAGE_SIZE", default_value_t = 50)]
    page_size: u32,

    /// Give up after this many search requests.
    #[arg(long, env = "TRACKER_MAX_PAGES", default_value_t = 100)]
    max_pages: usize,

    /// Retries for empty pages before giving up.
    #[arg(long, env = "TRACKER_MAX_RETRIES", default_value_t = 3)]
    max_retries: usize,

    /// Region to bias search results towards.
    #[arg(long, env = "TRACKER_REGION_CODE", default_value = "US")]
    region_code: String,

    /// Spreadsheet to merge new channels into, relative to the working directory.
    #[arg(long, env = "TRACKER_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("determine current working directory")?;
    let output_path = cwd.join(&cli.output);

    let config = TrackerConfig::builder()
        .target_count(cli.target_count)
        .search_window_days(cli.search_window_days)
        .max_channel_age_days(cli.max_channel_age_days)
        .page_size(cli.page_size)
        .max_pages(cli.max_pages)
        .max_retries(cli.max_retries)
        .region_code(cli.region_code)
        .output_path(output_path.clone())
        .build()
        .context("invalid tracker configuration")?;

    tracing::info!("starting YouTube growth tracker");
    tracing::info!(cwd = %cwd.display(), "current working directory");

    let store = XlsxTableStore::new(&config.output_path);
    if store.exists() {
        tracing::info!(path = %store.path().display(), "channel table exists");
    } else {
        tracing::info!(path = %store.path().display(), "channel table will be created");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build HTTP client")?;
    let client = YouTubeClient::new(cli.api_key, http);
    let source = YouTubeSource::new(client, &config);

    let mut tracker = Tracker::new(config, source, store, TokioPacer);
    let summary = tracker.run().await;

    tracing::info!(
        pages = summary.pages_fetched,
        channels_evaluated = summary.channels_evaluated,
        outcome = %summary.outcome,
        "completed: found {}/{} channels matching criteria",
        summary.channels_found,
        summary.target,
    );
    tracing::info!(path = %output_path.display(), "channel table location");

    Ok(())
}
