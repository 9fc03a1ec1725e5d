//! Loader for the provider's wide ratios CSV.
//!
//! The data provider writes one CSV per run: a `Date` column plus one column
//! per ticker, each value already computed as instrument_close divided by
//! benchmark_close. The loader reads that file, sorts by date, trims to the
//! trailing window, and hands back typed series. Shape problems inside a
//! series (length, gaps, non-finite values) are the engine's concern, not
//! the loader's; nulls are surfaced as NaN so validation can name the exact
//! ticker and date.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

use crate::config::Universe;

use super::types::{RatioPoint, RatioSeries, RatioSet};

/// Column holding the session date.
pub const DATE_COLUMN: &str = "Date";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("missing 'Date' column in {0}")]
    MissingDateColumn(String),

    #[error("no universe columns found in {0}")]
    NoUniverseColumns(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Reader for wide ratio CSV files.
pub struct RatioCsvLoader {
    window: usize,
}

impl RatioCsvLoader {
    /// Create a loader that trims each file to the trailing `window` sessions.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Load a wide ratios CSV into a `RatioSet`.
    ///
    /// Columns outside the universe are ignored. Universe tickers with no
    /// column in the file are simply absent from the returned set; the
    /// engine's validation reports them as missing series.
    pub fn load(&self, path: &Path, universe: &Universe) -> Result<RatioSet, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let dates = self.read_dates(&df, path)?;

        let present: Vec<&String> = universe
            .tickers
            .iter()
            .filter(|t| has_column(&df, t))
            .collect();
        if present.is_empty() {
            return Err(LoaderError::NoUniverseColumns(path.display().to_string()));
        }

        // Session order in the file is not guaranteed; sort by date, then
        // keep the trailing window.
        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        let keep = &order[order.len().saturating_sub(self.window)..];

        let mut set = RatioSet::default();
        for ticker in present {
            let column = df.column(ticker)?.cast(&DataType::Float64)?;
            let values = column.f64()?;

            let points = keep
                .iter()
                .map(|&i| RatioPoint {
                    date: dates[i],
                    ratio: values.get(i).unwrap_or(f64::NAN),
                })
                .collect();

            set.push(RatioSeries::new(ticker.clone(), points));
        }

        Ok(set)
    }

    /// Parse the `Date` column as `%Y-%m-%d` strings.
    fn read_dates(&self, df: &DataFrame, path: &Path) -> Result<Vec<NaiveDate>, LoaderError> {
        let column = df
            .column(DATE_COLUMN)
            .map_err(|_| LoaderError::MissingDateColumn(path.display().to_string()))?;

        let strings = column.str().map_err(|_| {
            LoaderError::InvalidDate(format!("{DATE_COLUMN} column has unexpected type"))
        })?;

        let mut dates = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let raw = strings
                .get(idx)
                .ok_or_else(|| LoaderError::InvalidDate(format!("row {idx} has no date")))?;
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| LoaderError::InvalidDate(format!("{raw}: {e}")))?;
            dates.push(date);
        }

        Ok(dates)
    }
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}
