//! The weekly summary: one labeled row per instrument.
//!
//! This is the unit persisted for week-over-week comparison. A summary is
//! immutable once produced; a new week produces a new summary and the prior
//! one is read-only input to the change tracker.

use serde::{Deserialize, Serialize};

use crate::leadership::Leadership;
use crate::structure::Direction;

/// One instrument's full classification for the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub ticker: String,

    /// Full-window ratio return.
    pub ret_4w: f64,

    /// Trailing 5-session ratio return, when the window allows it.
    pub ret_5d: Option<f64>,

    pub direction: Direction,

    /// 1 = strongest full-window return.
    pub rank: usize,

    pub leadership: Leadership,
}

/// All instruments' classifications for one week, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Week identifier, e.g. "2026-W14". Sorts lexicographically.
    pub week: String,

    /// Sessions used per instrument.
    pub sessions: usize,

    pub rows: Vec<SummaryRow>,
}

impl WeeklySummary {
    /// Look up one instrument's row.
    pub fn row(&self, ticker: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.ticker == ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.ticker.as_str())
    }

    /// Rows with the given leadership label, in rank order.
    pub fn with_leadership(&self, leadership: Leadership) -> Vec<&SummaryRow> {
        self.rows
            .iter()
            .filter(|r| r.leadership == leadership)
            .collect()
    }

    /// Fixed-format ranking table for terminal output.
    pub fn table(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(format!(
            "{:>4}  {:<6} {:>9} {:>9}  {:<10} {}",
            "Rank", "Ticker", "4W Ret", "5D Ret", "Direction", "Leadership"
        ));

        for row in &self.rows {
            lines.push(format!(
                "{:>4}  {:<6} {:>9} {:>9}  {:<10} {}",
                row.rank,
                row.ticker,
                fmt_pct(Some(row.ret_4w)),
                fmt_pct(row.ret_5d),
                row.direction.as_str(),
                row.leadership.as_str(),
            ));
        }

        lines.join("\n")
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}
