//! CSV bar loading for the runner.
//!
//! Accepts the common daily-bar export shape: a `Date` column plus `Close`,
//! with `Open`/`High`/`Low`/`Volume` optional. Missing price cells are
//! forward-filled from the previous close; rows before the first valid close
//! are dropped. The loaded bars are enriched with indicator columns and
//! validated into a `MarketSeries` ready for the engine.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use swinglab_core::domain::{Bar, MarketSeries};
use swinglab_core::error::DataError;
use swinglab_core::indicators::enrich_bars;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("no usable rows in input")]
    Empty,

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Column layout resolved from the CSV header.
struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            date: find("date").ok_or(LoadError::MissingColumn("Date"))?,
            close: find("close").ok_or(LoadError::MissingColumn("Close"))?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

/// Load raw OHLCV bars from a CSV file. Indicator columns are left NaN.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let wrap = |source: csv::Error| LoadError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let columns = Columns::resolve(reader.headers().map_err(wrap)?)?;

    let mut bars: Vec<Bar> = Vec::new();
    let mut prev_close: Option<f64> = None;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(wrap)?;

        let date_field = record
            .get(columns.date)
            .ok_or_else(|| invalid(row, "missing date cell"))?;
        let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
            .map_err(|e| invalid(row, format!("unparseable date '{date_field}': {e}")))?;

        // Forward-fill: a blank or unparseable close takes the previous one;
        // rows before the first valid close are dropped.
        let close = match parse_cell(&record, Some(columns.close)) {
            Some(c) => c,
            None => match prev_close {
                Some(c) => c,
                None => continue,
            },
        };
        prev_close = Some(close);

        let open = parse_cell(&record, columns.open).unwrap_or(close);
        let high = parse_cell(&record, columns.high).unwrap_or(close);
        let low = parse_cell(&record, columns.low).unwrap_or(close);
        let volume = columns
            .volume
            .and_then(|i| record.get(i))
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        // Derived columns can disagree with a filled close; widen the range
        // so the bar stays sane.
        let high = high.max(open).max(close);
        let low = low.min(open).min(close);

        bars.push(Bar::from_ohlcv(date, open, high, low, close, volume));
    }

    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Load, enrich with indicators, and validate into a `MarketSeries`.
///
/// This is the primary entry point for the CLI.
pub fn load_series(path: &Path) -> Result<MarketSeries, LoadError> {
    let bars = load_bars(path)?;
    let enriched = enrich_bars(bars);
    Ok(MarketSeries::new(enriched)?)
}

fn parse_cell(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    let value: f64 = record.get(index?)?.parse().ok()?;
    value.is_finite().then_some(value)
}

fn invalid(row: usize, reason: impl Into<String>) -> LoadError {
    LoadError::InvalidRow {
        // Header is row 1 in the file.
        row: row + 2,
        reason: reason.into(),
    }
}
