//! Aggregate classification: breadth, tilt, and market risk state.

pub mod classifier;

pub use classifier::{
    AggregateClassifier, AggregateState, Breadth, DirectionCounts, RiskInputs, RiskState, Tilt,
};
