//! Leadership status classifier.
//!
//! Combines direction, rank, and return sign into a single label. The rules
//! are an ordered table evaluated top-down, first match wins; a falling
//! structure is always Weak no matter how well it ranks.

use serde::{Deserialize, Serialize};

use crate::structure::Direction;

/// Leadership status for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leadership {
    #[serde(rename = "Persistent Leader")]
    PersistentLeader,
    #[serde(rename = "Emerging Leader")]
    EmergingLeader,
    #[serde(rename = "Fading")]
    Fading,
    #[serde(rename = "Weak")]
    Weak,
    #[serde(rename = "Neutral")]
    Neutral,
}

impl Leadership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersistentLeader => "Persistent Leader",
            Self::EmergingLeader => "Emerging Leader",
            Self::Fading => "Fading",
            Self::Weak => "Weak",
            Self::Neutral => "Neutral",
        }
    }
}

/// Per-instrument facts the rules see.
#[derive(Debug, Clone, Copy)]
pub struct LeadershipInputs {
    pub direction: Direction,
    pub rank: usize,
    pub ret_4w: f64,
}

/// Top rank still counted as persistent leadership.
pub const PERSISTENT_MAX_RANK: usize = 3;

/// Ordered rule table. Evaluated top-down; the first predicate that holds
/// decides the label, and anything that falls through is Neutral.
const RULES: &[(Leadership, fn(&LeadershipInputs) -> bool)] = &[
    (Leadership::Weak, |i| i.direction == Direction::LhLl),
    (Leadership::PersistentLeader, |i| {
        i.rank <= PERSISTENT_MAX_RANK && i.direction == Direction::HhHl
    }),
    (Leadership::EmergingLeader, |i| {
        i.direction == Direction::HhHl
    }),
    (Leadership::Fading, |i| {
        i.direction == Direction::Transition && i.ret_4w > 0.0
    }),
];

/// Classify one instrument's leadership status.
pub fn classify(inputs: &LeadershipInputs) -> Leadership {
    for (label, applies) in RULES {
        if applies(inputs) {
            return *label;
        }
    }
    Leadership::Neutral
}
