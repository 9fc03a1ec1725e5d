//! Core data types for ratio series.
//!
//! A ratio series is one instrument's close divided by the benchmark close,
//! one point per session, oldest first. The engine only ever sees series
//! that already passed shape validation: exact window length, every ratio
//! finite and positive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Universe;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing ratio series for {0}")]
    MissingSeries(String),

    #[error("{ticker}: series has {actual} sessions, expected {expected}")]
    WrongLength {
        ticker: String,
        expected: usize,
        actual: usize,
    },

    #[error("{ticker}: ratio {value} on {date} is not a positive finite number")]
    BadValue {
        ticker: String,
        date: NaiveDate,
        value: f64,
    },
}

/// One session's ratio observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    pub date: NaiveDate,
    pub ratio: f64,
}

/// Ratio history for one instrument, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSeries {
    pub ticker: String,
    pub points: Vec<RatioPoint>,
}

impl RatioSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<RatioPoint>) -> Self {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// Build a series from bare values with synthetic consecutive dates.
    /// Intended for tests and fixtures.
    pub fn from_values(ticker: impl Into<String>, values: &[f64]) -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap_or_default();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &ratio)| RatioPoint {
                date: start + chrono::Duration::days(i as i64),
                ratio,
            })
            .collect();
        Self::new(ticker, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ratio values in session order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.ratio)
    }

    pub fn first_ratio(&self) -> Option<f64> {
        self.points.first().map(|p| p.ratio)
    }

    pub fn last_ratio(&self) -> Option<f64> {
        self.points.last().map(|p| p.ratio)
    }

    /// Check the series shape against the configured window.
    pub fn validate(&self, window: usize) -> Result<(), InputError> {
        if self.points.len() != window {
            return Err(InputError::WrongLength {
                ticker: self.ticker.clone(),
                expected: window,
                actual: self.points.len(),
            });
        }

        for point in &self.points {
            if !point.ratio.is_finite() || point.ratio <= 0.0 {
                return Err(InputError::BadValue {
                    ticker: self.ticker.clone(),
                    date: point.date,
                    value: point.ratio,
                });
            }
        }

        Ok(())
    }
}

/// The full per-instrument ratio set for one week.
#[derive(Debug, Clone, Default)]
pub struct RatioSet {
    series: Vec<RatioSeries>,
}

impl RatioSet {
    pub fn new(series: Vec<RatioSeries>) -> Self {
        Self { series }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&RatioSeries> {
        self.series.iter().find(|s| s.ticker == ticker)
    }

    pub fn push(&mut self, series: RatioSeries) {
        self.series.push(series);
    }

    /// Validate the set against a universe and window.
    ///
    /// Every universe ticker must have a series of the exact window length
    /// with positive finite ratios. Series for tickers outside the universe
    /// are ignored, matching the provider contract where extra columns may
    /// be present.
    pub fn validate(&self, universe: &Universe, window: usize) -> Result<(), InputError> {
        for ticker in &universe.tickers {
            let series = self
                .get(ticker)
                .ok_or_else(|| InputError::MissingSeries(ticker.clone()))?;
            series.validate(window)?;
        }
        Ok(())
    }
}
