//! Leadership status classification.

pub mod classifier;

pub use classifier::{classify, Leadership, LeadershipInputs, PERSISTENT_MAX_RANK};
