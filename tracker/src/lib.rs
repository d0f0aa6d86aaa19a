//! Finds recently created YouTube channels and keeps a spreadsheet of them.
//!
//! A run searches recent uploads page by page ([`source`]), looks up each uploader's channel, keeps
//! the ones created within the last few months ([`record::is_recent`]), and merges each of them
//! into a workbook sorted by subscriber count ([`table`]). The loop tying these together lives in
//! [`tracker`].

pub mod config;
pub mod pacing;
pub mod record;
pub mod source;
pub mod table;
pub mod tracker;
pub mod youtube_api;

#[cfg(test)]
mod testing;

pub use config::TrackerConfig;
pub use record::ChannelRecord;
pub use tracker::{Outcome, RunSummary, Tracker};
