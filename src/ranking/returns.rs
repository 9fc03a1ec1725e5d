//! Trailing ratio returns and rank assignment.

use serde::{Deserialize, Serialize};

use crate::data::RatioSeries;

/// Sessions in the short trailing return reported alongside the ranking.
pub const SHORT_RETURN_SESSIONS: usize = 5;

/// One instrument's returns before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentReturn {
    pub ticker: String,
    /// Full-window ratio return (the 4-week return at the default window).
    pub ret_4w: f64,
    /// Trailing 5-session ratio return; absent when the window is shorter.
    pub ret_5d: Option<f64>,
}

/// A ranked instrument. Rank 1 is the highest full-window return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub ticker: String,
    pub ret_4w: f64,
    pub ret_5d: Option<f64>,
    pub rank: usize,
}

/// Ratio return over the full window: last / first - 1.
///
/// The series has already passed validation (length >= 2, positive finite
/// ratios), so the division is well defined; an unvalidated short series
/// degenerates to 0.0 rather than panicking.
pub fn window_return(series: &RatioSeries) -> f64 {
    match (series.first_ratio(), series.last_ratio()) {
        (Some(first), Some(last)) if series.len() >= 2 && first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Ratio return over the trailing `sessions` sessions.
pub fn trailing_return(series: &RatioSeries, sessions: usize) -> Option<f64> {
    if sessions < 2 || series.len() < sessions {
        return None;
    }
    let tail = &series.points[series.len() - sessions..];
    let first = tail.first()?.ratio;
    let last = tail.last()?.ratio;
    if first > 0.0 {
        Some(last / first - 1.0)
    } else {
        None
    }
}

/// Rank instruments by full-window return, descending.
///
/// The sort is stable, so equal returns keep their input order: the
/// first-seen instrument wins the tie. Ranks are always exactly 1..=N.
pub fn rank_returns(returns: Vec<InstrumentReturn>) -> Vec<RankEntry> {
    let mut ordered = returns;
    ordered.sort_by(|a, b| b.ret_4w.total_cmp(&a.ret_4w));

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, r)| RankEntry {
            ticker: r.ticker,
            ret_4w: r.ret_4w,
            ret_5d: r.ret_5d,
            rank: idx + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ret(ticker: &str, ret_4w: f64) -> InstrumentReturn {
        InstrumentReturn {
            ticker: ticker.to_string(),
            ret_4w,
            ret_5d: None,
        }
    }

    #[test]
    fn test_window_return() {
        let series = RatioSeries::from_values("XLK", &[1.0, 1.05, 1.1]);
        let r = window_return(&series);
        assert!((r - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_trailing_return_uses_tail() {
        let values = [9.0, 9.0, 9.0, 1.0, 1.0, 1.0, 1.0, 1.1];
        let series = RatioSeries::from_values("XLF", &values);
        let r = trailing_return(&series, SHORT_RETURN_SESSIONS).unwrap();
        assert!((r - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_return_absent_when_window_short() {
        let series = RatioSeries::from_values("XLF", &[1.0, 1.1]);
        assert_eq!(trailing_return(&series, SHORT_RETURN_SESSIONS), None);
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let ranked = rank_returns(vec![
            ret("A", 0.02),
            ret("B", 0.05),
            ret("C", -0.01),
            ret("D", 0.03),
        ]);

        let mut ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        assert_eq!(ranked[0].ticker, "B");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].ticker, "C");
        assert_eq!(ranked[3].rank, 4);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank_returns(vec![ret("A", 0.02), ret("B", 0.02), ret("C", 0.02)]);
        assert_eq!(ranked[0].ticker, "A");
        assert_eq!(ranked[1].ticker, "B");
        assert_eq!(ranked[2].ticker, "C");
    }

    #[test]
    fn test_reversing_returns_reverses_rank() {
        let first = rank_returns(vec![ret("A", 0.05), ret("B", 0.01)]);
        let second = rank_returns(vec![ret("A", 0.01), ret("B", 0.05)]);

        assert_eq!(first[0].ticker, "A");
        assert_eq!(second[0].ticker, "B");
    }
}
