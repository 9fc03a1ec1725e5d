//! JSON snapshot store for weekly summaries.
//!
//! One file per week under the snapshot directory: `<dir>/<week>.json`,
//! pretty-printed, retained indefinitely as read-only history. Week
//! identifiers sort lexicographically (e.g. "2026-W09" < "2026-W14"), which
//! is what `latest_before` relies on.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::summary::WeeklySummary;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prior summary does not cover ticker {0}")]
    MissingInPrevious(String),

    #[error("prior summary has ticker {0} outside the current universe")]
    UnknownInPrevious(String),
}

/// Reader/writer for weekly snapshot files.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, week: &str) -> PathBuf {
        self.dir.join(format!("{week}.json"))
    }

    /// Persist one week's summary, creating the directory if needed.
    pub fn save(&self, summary: &WeeklySummary) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&summary.week);
        let content = serde_json::to_string_pretty(summary)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Load one week's summary. A missing week is a defined absent state,
    /// not an error.
    pub fn load(&self, week: &str) -> Result<Option<WeeklySummary>, SnapshotError> {
        let path = self.path_for(week);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let summary = serde_json::from_str(&content)?;
        Ok(Some(summary))
    }

    /// All stored week identifiers, sorted ascending.
    pub fn weeks(&self) -> Result<Vec<String>, SnapshotError> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut weeks = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(week) = name.strip_suffix(".json") {
                weeks.push(week.to_string());
            }
        }
        weeks.sort();
        Ok(weeks)
    }

    /// The most recent stored summary strictly before `week`.
    pub fn latest_before(&self, week: &str) -> Result<Option<WeeklySummary>, SnapshotError> {
        let prior = self
            .weeks()?
            .into_iter()
            .filter(|w| w.as_str() < week)
            .next_back();

        match prior {
            Some(w) => self.load(&w),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leadership::Leadership;
    use crate::snapshot::SummaryRow;
    use crate::structure::Direction;

    fn summary(week: &str) -> WeeklySummary {
        WeeklySummary {
            week: week.to_string(),
            sessions: 20,
            rows: vec![SummaryRow {
                ticker: "XLK".to_string(),
                ret_4w: 0.02,
                ret_5d: Some(0.005),
                direction: Direction::HhHl,
                rank: 1,
                leadership: Leadership::PersistentLeader,
            }],
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&summary("2026-W14")).unwrap();
        let loaded = store.load("2026-W14").unwrap().unwrap();
        assert_eq!(loaded, summary("2026-W14"));
    }

    #[test]
    fn test_missing_week_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(store.load("2026-W14").unwrap().is_none());
    }

    #[test]
    fn test_weeks_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&summary("2026-W14")).unwrap();
        store.save(&summary("2026-W09")).unwrap();
        store.save(&summary("2026-W11")).unwrap();

        assert_eq!(store.weeks().unwrap(), vec!["2026-W09", "2026-W11", "2026-W14"]);
    }

    #[test]
    fn test_latest_before() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&summary("2026-W09")).unwrap();
        store.save(&summary("2026-W11")).unwrap();
        store.save(&summary("2026-W14")).unwrap();

        let prior = store.latest_before("2026-W14").unwrap().unwrap();
        assert_eq!(prior.week, "2026-W11");

        assert!(store.latest_before("2026-W09").unwrap().is_none());
    }
}
