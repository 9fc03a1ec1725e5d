//! Breadth, tilt, and market risk state.
//!
//! All three aggregates come from simple counts over the labeled weekly
//! rows. The risk state is an ordered rule table evaluated in strict
//! priority order; the sequence and the exact thresholds are load-bearing
//! (a week satisfying both Risk-Off and Defensive Shift must report
//! Risk-Off).

use serde::{Deserialize, Serialize};

use crate::config::{Category, Universe};
use crate::leadership::Leadership;
use crate::snapshot::SummaryRow;
use crate::structure::Direction;

/// HH/HL count at or above which participation is broad.
pub const BROAD_MIN_HH_HL: usize = 4;
/// HH/HL count at or below which leadership is narrow.
pub const NARROW_MAX_HH_HL: usize = 2;
/// Category HH/HL count that tips the tilt.
pub const TILT_MIN_CATEGORY_HH_HL: usize = 3;
/// LH/LL count that forces Risk-Off.
pub const RISK_OFF_MIN_LH_LL: usize = 5;
/// HH/HL count required (with cyclical tilt) for Risk-On.
pub const RISK_ON_MIN_HH_HL: usize = 4;

/// How widely the rising structure is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breadth {
    #[serde(rename = "Broad Participation")]
    BroadParticipation,
    #[serde(rename = "Fragmented")]
    Fragmented,
    #[serde(rename = "Narrow Leadership")]
    NarrowLeadership,
}

impl Breadth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BroadParticipation => "Broad Participation",
            Self::Fragmented => "Fragmented",
            Self::NarrowLeadership => "Narrow Leadership",
        }
    }
}

/// Where the rising structure concentrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tilt {
    #[serde(rename = "Defensive Tilt")]
    DefensiveTilt,
    #[serde(rename = "Cyclical Tilt")]
    CyclicalTilt,
    #[serde(rename = "Balanced")]
    Balanced,
}

impl Tilt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefensiveTilt => "Defensive Tilt",
            Self::CyclicalTilt => "Cyclical Tilt",
            Self::Balanced => "Balanced",
        }
    }
}

/// One deterministic label for the week's structural posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskState {
    #[serde(rename = "Risk-On")]
    RiskOn,
    #[serde(rename = "Defensive Shift")]
    DefensiveShift,
    #[serde(rename = "Narrow Leadership")]
    NarrowLeadership,
    #[serde(rename = "Fragmented")]
    Fragmented,
    #[serde(rename = "Risk-Off")]
    RiskOff,
    #[serde(rename = "Balanced")]
    Balanced,
}

impl RiskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskOn => "Risk-On",
            Self::DefensiveShift => "Defensive Shift",
            Self::NarrowLeadership => "Narrow Leadership",
            Self::Fragmented => "Fragmented",
            Self::RiskOff => "Risk-Off",
            Self::Balanced => "Balanced",
        }
    }
}

/// Direction label counts over the universe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts {
    pub hh_hl: usize,
    pub lh_ll: usize,
    pub range: usize,
    pub transition: usize,
}

impl DirectionCounts {
    pub fn tally(rows: &[SummaryRow]) -> Self {
        let mut counts = Self::default();
        for row in rows {
            match row.direction {
                Direction::HhHl => counts.hh_hl += 1,
                Direction::LhLl => counts.lh_ll += 1,
                Direction::Range => counts.range += 1,
                Direction::Transition => counts.transition += 1,
            }
        }
        counts
    }
}

/// Everything the risk-state rules are allowed to see.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs {
    pub counts: DirectionCounts,
    pub defensive_hh_hl: usize,
    pub cyclical_hh_hl: usize,
    pub persistent_leaders: usize,
    pub tilt: Tilt,
}

/// Risk-state rule table, strict priority order. The first predicate that
/// holds decides the state; later rules are never consulted.
const RISK_RULES: &[(RiskState, fn(&RiskInputs) -> bool)] = &[
    (RiskState::RiskOff, |i| i.counts.lh_ll >= RISK_OFF_MIN_LH_LL),
    (RiskState::DefensiveShift, |i| {
        i.defensive_hh_hl >= TILT_MIN_CATEGORY_HH_HL
    }),
    (RiskState::RiskOn, |i| {
        i.counts.hh_hl >= RISK_ON_MIN_HH_HL && i.tilt == Tilt::CyclicalTilt
    }),
    (RiskState::NarrowLeadership, |i| {
        i.persistent_leaders == 1 || i.persistent_leaders == 2
    }),
    (RiskState::Fragmented, |i| {
        i.counts.hh_hl > 0 && i.counts.lh_ll > 0
    }),
];

/// The aggregate classification for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateState {
    pub breadth: Breadth,
    pub tilt: Tilt,
    pub risk_state: RiskState,
    pub counts: DirectionCounts,
    pub defensive_hh_hl: usize,
    pub cyclical_hh_hl: usize,
    pub persistent_leaders: usize,

    /// Instruments whose direction or leadership changed since the prior
    /// week. Absent (not zero) when there is no prior snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<usize>,
}

impl AggregateState {
    /// Fixed-format aggregate block for terminal output.
    pub fn summary(&self) -> String {
        format!(
            "Breadth: {}\n\
             Tilt: {}\n\
             Risk State: {}\n\
             HH/HL: {}  LH/LL: {}  RANGE: {}  TRANSITION: {}\n\
             Defensive HH/HL: {}  Cyclical HH/HL: {}  Persistent Leaders: {}\n\
             Change vs Last Week: {}",
            self.breadth.as_str(),
            self.tilt.as_str(),
            self.risk_state.as_str(),
            self.counts.hh_hl,
            self.counts.lh_ll,
            self.counts.range,
            self.counts.transition,
            self.defensive_hh_hl,
            self.cyclical_hh_hl,
            self.persistent_leaders,
            match self.changes {
                Some(n) => n.to_string(),
                None => "n/a".to_string(),
            },
        )
    }
}

/// Aggregate classifier over the full labeled set.
pub struct AggregateClassifier;

impl AggregateClassifier {
    /// Derive breadth, tilt, and risk state from the week's rows.
    ///
    /// `changes` is the change tracker's output, passed through untouched so
    /// absence stays distinguishable from zero.
    pub fn classify(
        rows: &[SummaryRow],
        universe: &Universe,
        changes: Option<usize>,
    ) -> AggregateState {
        let counts = DirectionCounts::tally(rows);
        let defensive_hh_hl = category_hh_hl(rows, universe, Category::Defensive);
        let cyclical_hh_hl = category_hh_hl(rows, universe, Category::Cyclical);
        let persistent_leaders = rows
            .iter()
            .filter(|r| r.leadership == Leadership::PersistentLeader)
            .count();

        let breadth = Self::breadth(&counts);
        let tilt = Self::tilt(defensive_hh_hl, cyclical_hh_hl);
        let inputs = RiskInputs {
            counts,
            defensive_hh_hl,
            cyclical_hh_hl,
            persistent_leaders,
            tilt,
        };
        let risk_state = Self::risk_state(&inputs);

        AggregateState {
            breadth,
            tilt,
            risk_state,
            counts,
            defensive_hh_hl,
            cyclical_hh_hl,
            persistent_leaders,
            changes,
        }
    }

    fn breadth(counts: &DirectionCounts) -> Breadth {
        if counts.hh_hl >= BROAD_MIN_HH_HL {
            Breadth::BroadParticipation
        } else if counts.hh_hl <= NARROW_MAX_HH_HL {
            Breadth::NarrowLeadership
        } else {
            Breadth::Fragmented
        }
    }

    /// The defensive check runs first: when both categories clear the
    /// threshold, the tilt is defensive.
    fn tilt(defensive_hh_hl: usize, cyclical_hh_hl: usize) -> Tilt {
        if defensive_hh_hl >= TILT_MIN_CATEGORY_HH_HL {
            Tilt::DefensiveTilt
        } else if cyclical_hh_hl >= TILT_MIN_CATEGORY_HH_HL {
            Tilt::CyclicalTilt
        } else {
            Tilt::Balanced
        }
    }

    fn risk_state(inputs: &RiskInputs) -> RiskState {
        for (state, triggered) in RISK_RULES {
            if triggered(inputs) {
                return *state;
            }
        }
        RiskState::Balanced
    }
}

fn category_hh_hl(rows: &[SummaryRow], universe: &Universe, category: Category) -> usize {
    rows.iter()
        .filter(|r| r.direction == Direction::HhHl && universe.category_of(&r.ticker) == category)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build 11 rows over the default universe with the given directions,
    /// assigned in universe order.
    fn rows_with(directions: &[Direction]) -> (Vec<SummaryRow>, Universe) {
        let universe = Universe::default();
        assert_eq!(directions.len(), universe.len());

        let rows = universe
            .tickers
            .iter()
            .zip(directions.iter())
            .enumerate()
            .map(|(idx, (ticker, &direction))| {
                let rank = idx + 1;
                SummaryRow {
                    ticker: ticker.clone(),
                    ret_4w: 0.01,
                    ret_5d: None,
                    direction,
                    rank,
                    leadership: crate::leadership::classify(
                        &crate::leadership::LeadershipInputs {
                            direction,
                            rank,
                            ret_4w: 0.01,
                        },
                    ),
                }
            })
            .collect();

        (rows, universe)
    }

    fn directions_for(tickers_hh: &[&str], tickers_lh: &[&str]) -> Vec<Direction> {
        Universe::default()
            .tickers
            .iter()
            .map(|t| {
                if tickers_hh.contains(&t.as_str()) {
                    Direction::HhHl
                } else if tickers_lh.contains(&t.as_str()) {
                    Direction::LhLl
                } else {
                    Direction::Range
                }
            })
            .collect()
    }

    #[test]
    fn test_breadth_thresholds() {
        let broad = DirectionCounts {
            hh_hl: 4,
            ..Default::default()
        };
        assert_eq!(AggregateClassifier::breadth(&broad), Breadth::BroadParticipation);

        let narrow = DirectionCounts {
            hh_hl: 2,
            ..Default::default()
        };
        assert_eq!(AggregateClassifier::breadth(&narrow), Breadth::NarrowLeadership);

        let fragmented = DirectionCounts {
            hh_hl: 3,
            ..Default::default()
        };
        assert_eq!(AggregateClassifier::breadth(&fragmented), Breadth::Fragmented);
    }

    #[test]
    fn test_tilt_defensive_takes_priority() {
        assert_eq!(AggregateClassifier::tilt(3, 5), Tilt::DefensiveTilt);
        assert_eq!(AggregateClassifier::tilt(2, 3), Tilt::CyclicalTilt);
        assert_eq!(AggregateClassifier::tilt(2, 2), Tilt::Balanced);
    }

    #[test]
    fn test_risk_off_beats_defensive_shift() {
        // 3 defensive HH/HL (Defensive Shift threshold met) AND 5 LH/LL
        // (Risk-Off threshold met): priority says Risk-Off.
        let directions = directions_for(
            &["XLP", "XLU", "XLV"],
            &["XLB", "XLE", "XLF", "XLI", "XLK"],
        );
        let (rows, universe) = rows_with(&directions);
        let state = AggregateClassifier::classify(&rows, &universe, None);

        assert_eq!(state.counts.lh_ll, 5);
        assert_eq!(state.defensive_hh_hl, 3);
        assert_eq!(state.risk_state, RiskState::RiskOff);
    }

    #[test]
    fn test_defensive_shift_scenario() {
        // 7 HH/HL (3 defensive) and 4 LH/LL: Risk-Off needs 5, so the
        // defensive rule fires.
        let directions = directions_for(
            &["XLP", "XLU", "XLV", "XLB", "XLE", "XLF", "XLI"],
            &["XLK", "XLY", "XLC", "XLRE"],
        );
        let (rows, universe) = rows_with(&directions);
        let state = AggregateClassifier::classify(&rows, &universe, None);

        assert_eq!(state.counts.hh_hl, 7);
        assert_eq!(state.counts.lh_ll, 4);
        assert_eq!(state.breadth, Breadth::BroadParticipation);
        assert_eq!(state.tilt, Tilt::DefensiveTilt);
        assert_eq!(state.risk_state, RiskState::DefensiveShift);
    }

    #[test]
    fn test_risk_on_needs_cyclical_tilt() {
        // 4 cyclical HH/HL, no defensive participation, nothing falling.
        let directions = directions_for(&["XLB", "XLF", "XLI", "XLK"], &[]);
        let (rows, universe) = rows_with(&directions);
        let state = AggregateClassifier::classify(&rows, &universe, None);

        assert_eq!(state.tilt, Tilt::CyclicalTilt);
        assert_eq!(state.risk_state, RiskState::RiskOn);
    }

    #[test]
    fn test_narrow_leadership_with_two_persistent_leaders() {
        // Two HH/HL in the top three ranks (universe order puts XLB and XLE
        // at ranks 1 and 2), nothing else rising, nothing falling: rules
        // 1-3 fail, rule 4 fires.
        let directions = directions_for(&["XLB", "XLE"], &[]);
        let (rows, universe) = rows_with(&directions);
        let state = AggregateClassifier::classify(&rows, &universe, None);

        assert_eq!(state.persistent_leaders, 2);
        assert_eq!(state.risk_state, RiskState::NarrowLeadership);
    }

    #[test]
    fn test_fragmented_when_mixed_without_concentration() {
        // 3 HH/HL ranked outside the top three, 3 LH/LL: no rule 1-4 match.
        let universe = Universe::default();
        let mut rows = Vec::new();
        for (idx, ticker) in universe.tickers.iter().enumerate() {
            let rank = idx + 1;
            let direction = match idx {
                // Ranks 4-6 rising, ranks 7-9 falling, rest ranging.
                3..=5 => Direction::HhHl,
                6..=8 => Direction::LhLl,
                _ => Direction::Range,
            };
            rows.push(SummaryRow {
                ticker: ticker.clone(),
                ret_4w: 0.0,
                ret_5d: None,
                direction,
                rank,
                leadership: crate::leadership::classify(
                    &crate::leadership::LeadershipInputs {
                        direction,
                        rank,
                        ret_4w: 0.0,
                    },
                ),
            });
        }

        let state = AggregateClassifier::classify(&rows, &universe, None);
        assert_eq!(state.persistent_leaders, 0);
        assert_eq!(state.risk_state, RiskState::Fragmented);
    }

    #[test]
    fn test_balanced_fallback() {
        let directions = directions_for(&[], &[]);
        let (rows, universe) = rows_with(&directions);
        let state = AggregateClassifier::classify(&rows, &universe, None);

        assert_eq!(state.risk_state, RiskState::Balanced);
        assert_eq!(state.breadth, Breadth::NarrowLeadership);
        assert_eq!(state.tilt, Tilt::Balanced);
    }

    #[test]
    fn test_changes_pass_through() {
        let directions = directions_for(&[], &[]);
        let (rows, universe) = rows_with(&directions);

        let absent = AggregateClassifier::classify(&rows, &universe, None);
        assert_eq!(absent.changes, None);

        let zero = AggregateClassifier::classify(&rows, &universe, Some(0));
        assert_eq!(zero.changes, Some(0));
    }
}
