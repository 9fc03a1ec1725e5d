//! Weekly classification orchestration.

pub mod weekly;

pub use weekly::{ClassificationEngine, EngineError, WeeklyClassification};
