//! Structural direction classification.
//!
//! Labels each instrument's ratio window with one of:
//! - HH/HL: higher high and higher low, half over half
//! - LH/LL: lower high and lower low
//! - TRANSITION: one-sided shift
//! - RANGE: no shift

pub mod classifier;

pub use classifier::{Direction, StructureClassifier};
