//! The weekly classification engine.
//!
//! One run is a pure function of its inputs: the week's ratio set, the
//! optional prior summary, and the configuration. The engine validates
//! everything up front and produces either the full composed result or an
//! error, never a partial summary or a substituted default label.

use std::collections::HashMap;

use thiserror::Error;

use crate::aggregate::{AggregateClassifier, AggregateState};
use crate::config::{ConfigError, EngineConfig, Universe};
use crate::data::{InputError, RatioSet};
use crate::leadership::{self, LeadershipInputs};
use crate::ranking::{
    rank_returns, trailing_return, window_return, InstrumentReturn, SHORT_RETURN_SESSIONS,
};
use crate::snapshot::{count_changes, SnapshotError, SummaryRow, WeeklySummary};
use crate::structure::{Direction, StructureClassifier};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The composed result of one weekly run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyClassification {
    pub summary: WeeklySummary,
    pub aggregate: AggregateState,
}

/// Orchestrates direction, ranking, leadership, aggregate, and change
/// classification for one week.
pub struct ClassificationEngine {
    config: EngineConfig,
    universe: Universe,
    structure: StructureClassifier,
}

impl ClassificationEngine {
    /// Create an engine, validating configuration and universe.
    pub fn new(config: EngineConfig, universe: Universe) -> Result<Self, ConfigError> {
        config.validate()?;
        universe.validate()?;

        let structure = StructureClassifier::new(config.window_size, config.epsilon);
        Ok(Self {
            config,
            universe,
            structure,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Classify one week.
    ///
    /// Fails fast on any shape problem. `prior` is last week's summary when
    /// one exists; without it the change count is absent, not zero.
    pub fn classify(
        &self,
        week: &str,
        ratios: &RatioSet,
        prior: Option<&WeeklySummary>,
    ) -> Result<WeeklyClassification, EngineError> {
        ratios.validate(&self.universe, self.config.window_size)?;

        // Per-instrument passes, in universe order so ranking ties break on
        // input order.
        let mut directions: HashMap<String, Direction> = HashMap::new();
        let mut returns = Vec::with_capacity(self.universe.len());

        for ticker in &self.universe.tickers {
            let series = ratios
                .get(ticker)
                .ok_or_else(|| InputError::MissingSeries(ticker.clone()))?;

            directions.insert(ticker.clone(), self.structure.classify(series));
            returns.push(InstrumentReturn {
                ticker: ticker.clone(),
                ret_4w: window_return(series),
                ret_5d: trailing_return(series, SHORT_RETURN_SESSIONS),
            });
        }

        let ranked = rank_returns(returns);

        let mut rows = Vec::with_capacity(ranked.len());
        for entry in ranked {
            let direction = directions
                .remove(&entry.ticker)
                .ok_or_else(|| InputError::MissingSeries(entry.ticker.clone()))?;

            let leadership = leadership::classify(&LeadershipInputs {
                direction,
                rank: entry.rank,
                ret_4w: entry.ret_4w,
            });

            rows.push(SummaryRow {
                ticker: entry.ticker,
                ret_4w: entry.ret_4w,
                ret_5d: entry.ret_5d,
                direction,
                rank: entry.rank,
                leadership,
            });
        }

        let summary = WeeklySummary {
            week: week.to_string(),
            sessions: self.config.window_size,
            rows,
        };

        let changes = match prior {
            Some(previous) => Some(count_changes(&summary, previous)?),
            None => None,
        };

        let aggregate = AggregateClassifier::classify(&summary.rows, &self.universe, changes);

        Ok(WeeklyClassification { summary, aggregate })
    }
}
