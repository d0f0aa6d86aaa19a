//! The persisted channel table.
//!
//! The table is small (tens of rows per run), so every change re-reads the whole file, adds the
//! new row, re-sorts, and writes the whole file back out. [`TableStore`] keeps that strategy
//! behind `load`/`save` so the tracker does not care how rows are actually kept.

use crate::record::{ChannelRecord, parse_published_at};
use calamine::{Data, Reader, open_workbook_auto};
use eyre::Context;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Name of the worksheet that holds the channel table.
pub const SHEET_NAME: &str = "New Channels";

/// Width of the url column, in characters.
const URL_COLUMN_WIDTH: f64 = 50.0;

/// Whole-table persistence for channel records.
pub trait TableStore {
    /// Reads every persisted row, in stored order.
    ///
    /// A table that does not exist yet is empty, not an error.
    fn load(&self) -> eyre::Result<Vec<ChannelRecord>>;

    /// Replaces the persisted table with `rows`.
    fn save(&mut self, rows: &[ChannelRecord]) -> eyre::Result<()>;

    /// Human-readable description of where the table lives, for diagnostics.
    fn location(&self) -> String;
}

/// Adds `record` to the table in `store`, keeping the table sorted by subscriber count, most
/// subscribers first.
///
/// The sort is stable, so rows with equal subscriber counts keep their existing relative order
/// and the new row goes after any it ties with. If the existing table cannot be read, it is
/// discarded and the table is rewritten with just the new row.
///
/// Returns the number of rows in the table after the merge.
pub fn merge_record<T>(store: &mut T, record: ChannelRecord) -> eyre::Result<usize>
where
    T: TableStore + ?Sized,
{
    let mut rows = match store.load() {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                location = %store.location(),
                "existing channel table is unreadable, starting over: {e:#}"
            );
            Vec::new()
        }
    };

    rows.push(record);
    rows.sort_by(|a, b| b.subscriber_count.cmp(&a.subscriber_count));

    store
        .save(&rows)
        .with_context(|| format!("write channel table to {}", store.location()))?;

    Ok(rows.len())
}

/// Keeps the channel table as an Excel workbook.
///
/// The workbook has a single sheet, [`SHEET_NAME`], with a header row naming
/// [`ChannelRecord::COLUMNS`] followed by one row per channel. Channel URLs are written as
/// hyperlinks.
#[derive(Debug, Clone)]
pub struct XlsxTableStore {
    path: PathBuf,
}

impl XlsxTableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the workbook already exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TableStore for XlsxTableStore {
    fn load(&self) -> eyre::Result<Vec<ChannelRecord>> {
        if !self.exists() {
            tracing::info!(path = %self.path.display(), "no existing channel table");
            return Ok(Vec::new());
        }

        tracing::info!(path = %self.path.display(), "reading existing channel table");
        let mut workbook = open_workbook_auto(&self.path)
            .with_context(|| format!("open workbook {}", self.path.display()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| eyre::eyre!("workbook {} has no worksheets", self.path.display()))?
            .context("read first worksheet")?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            // an empty sheet is an empty table
            return Ok(Vec::new());
        };
        let header: Vec<String> = header.iter().map(cell_text).collect();
        if header != ChannelRecord::COLUMNS {
            eyre::bail!("unexpected header row {header:?}");
        }

        rows.enumerate()
            .map(|(i, row)| {
                // +2: one for the header, one because spreadsheet rows count from 1
                record_from_row(row).with_context(|| format!("parse row {}", i + 2))
            })
            .collect()
    }

    fn save(&mut self, rows: &[ChannelRecord]) -> eyre::Result<()> {
        tracing::info!(path = %self.path.display(), rows = rows.len(), "writing channel table");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header = Format::new().set_bold();
        for (col, name) in (0u16..).zip(ChannelRecord::COLUMNS) {
            worksheet.write_string_with_format(0, col, name, &header)?;
        }

        for (row, record) in (1u32..).zip(rows) {
            worksheet.write_string(row, 0, &record.channel_id)?;
            worksheet.write_string(row, 1, &record.title)?;
            worksheet.write_string(row, 2, &record.description)?;
            worksheet.write_string(row, 3, record.published_at.to_string())?;
            // precise up to 2^53 subscribers
            worksheet.write_number(row, 4, record.subscriber_count as f64)?;
            worksheet.write_url(row, 5, record.url.as_str())?;
        }
        worksheet.set_column_width(5, URL_COLUMN_WIDTH)?;

        workbook
            .save(&self.path)
            .with_context(|| format!("save workbook {}", self.path.display()))?;

        match std::fs::metadata(&self.path) {
            Ok(metadata) => tracing::info!(
                path = %self.path.display(),
                bytes = metadata.len(),
                "wrote channel table"
            ),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                "channel table missing right after writing it: {e}"
            ),
        }

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn record_from_row(row: &[Data]) -> eyre::Result<ChannelRecord> {
    let text = |col: usize| row.get(col).map(cell_text).unwrap_or_default();

    let channel_id = text(0);
    if channel_id.is_empty() {
        eyre::bail!("row has no channel_id");
    }

    let published_at = parse_published_at(&text(3))?;

    let subscriber_count = match row.get(4) {
        Some(Data::Float(n)) if *n >= 0.0 && n.fract() == 0.0 => *n as u64,
        Some(Data::Int(n)) => u64::try_from(*n).context("negative subscriber_count")?,
        Some(Data::String(s)) => s
            .trim()
            .parse::<u64>()
            .with_context(|| format!("parse subscriber_count {s:?}"))?,
        other => eyre::bail!("invalid subscriber_count {other:?}"),
    };

    let mut url = text(5);
    if url.is_empty() {
        url = ChannelRecord::url_for(&channel_id);
    }

    Ok(ChannelRecord {
        title: text(1),
        description: text(2),
        published_at,
        subscriber_count,
        url,
        channel_id,
    })
}
