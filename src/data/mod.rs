//! Ratio series data model and input adapters.

pub mod loader;
pub mod types;

pub use loader::{LoaderError, RatioCsvLoader, DATE_COLUMN};
pub use types::{InputError, RatioPoint, RatioSeries, RatioSet};
