//! Structural direction classifier.
//!
//! Splits a ratio window into two equal halves and compares the extremes of
//! each half. Rules are evaluated in fixed order, first match wins:
//! higher high AND higher low is HH/HL, lower high AND lower low is LH/LL,
//! any remaining single-sided shift is TRANSITION, everything else is RANGE.

use serde::{Deserialize, Serialize};

use crate::data::RatioSeries;

/// Structural state of one instrument's ratio window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Higher high and higher low, second half over first.
    #[serde(rename = "HH/HL")]
    HhHl,
    /// Lower high and lower low.
    #[serde(rename = "LH/LL")]
    LhLl,
    /// No directional shift in either half-pair.
    #[serde(rename = "RANGE")]
    Range,
    /// Exactly one side shifted; structure is changing but not resolved.
    #[serde(rename = "TRANSITION")]
    Transition,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HhHl => "HH/HL",
            Self::LhLl => "LH/LL",
            Self::Range => "RANGE",
            Self::Transition => "TRANSITION",
        }
    }

    /// Description of the structural state.
    pub fn description(&self) -> &'static str {
        match self {
            Self::HhHl => "Rising structure (higher highs, higher lows)",
            Self::LhLl => "Falling structure (lower highs, lower lows)",
            Self::Range => "Range-bound, no directional shift",
            Self::Transition => "One-sided shift, structure unresolved",
        }
    }
}

/// Half-over-half comparison flags for one window.
///
/// With a non-zero epsilon, a move must clear the guard band to register;
/// an exactly equal (or sub-epsilon) half-pair counts as neither up nor
/// down, so a flat window falls through to RANGE.
#[derive(Debug, Clone, Copy)]
struct HalfShift {
    higher_high: bool,
    higher_low: bool,
    lower_high: bool,
    lower_low: bool,
}

/// Direction classifier for ratio windows.
///
/// Pure: no state is retained between instruments. The engine validates
/// series length before classification, so `classify` always sees exactly
/// `2 * half` sessions.
pub struct StructureClassifier {
    half: usize,
    epsilon: f64,
}

impl StructureClassifier {
    /// Create a classifier for an even `window` with the given noise guard.
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self {
            half: window / 2,
            epsilon,
        }
    }

    /// Classify one instrument's window.
    pub fn classify(&self, series: &RatioSeries) -> Direction {
        let values: Vec<f64> = series.values().collect();
        let (first, second) = values.split_at(self.half.min(values.len()));
        let shift = self.compare_halves(first, second);

        if shift.higher_high && shift.higher_low {
            return Direction::HhHl;
        }
        if shift.lower_high && shift.lower_low {
            return Direction::LhLl;
        }
        if (shift.higher_high && !shift.higher_low)
            || (shift.higher_low && !shift.higher_high)
            || (shift.lower_high && !shift.lower_low)
            || (shift.lower_low && !shift.lower_high)
        {
            return Direction::Transition;
        }

        Direction::Range
    }

    fn compare_halves(&self, first: &[f64], second: &[f64]) -> HalfShift {
        let (max1, min1) = extrema(first);
        let (max2, min2) = extrema(second);
        let eps = self.epsilon;

        HalfShift {
            higher_high: max2 > max1 + eps,
            higher_low: min2 > min1 + eps,
            lower_high: max2 < max1 - eps,
            lower_low: min2 < min1 - eps,
        }
    }
}

/// Max and min of a non-empty slice.
fn extrema(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::MIN, f64::MAX), |(max, min), &v| {
        (max.max(v), min.min(v))
    })
}
