//! Week-over-week change tracking.
//!
//! An instrument counts as changed when its direction OR its leadership
//! label differs from the prior week. The universe is assumed stable: a
//! ticker present on one side but not the other is a fatal mismatch, never
//! silently skipped.

use super::store::SnapshotError;
use super::summary::WeeklySummary;

/// Count instruments whose direction or leadership changed since `previous`.
pub fn count_changes(
    current: &WeeklySummary,
    previous: &WeeklySummary,
) -> Result<usize, SnapshotError> {
    for ticker in previous.tickers() {
        if current.row(ticker).is_none() {
            return Err(SnapshotError::UnknownInPrevious(ticker.to_string()));
        }
    }

    let mut changed = 0;
    for row in &current.rows {
        let prior = previous
            .row(&row.ticker)
            .ok_or_else(|| SnapshotError::MissingInPrevious(row.ticker.clone()))?;

        if row.direction != prior.direction || row.leadership != prior.leadership {
            changed += 1;
        }
    }

    Ok(changed)
}
