//! Relative-strength ranking by trailing ratio return.

pub mod returns;

pub use returns::{
    rank_returns, trailing_return, window_return, InstrumentReturn, RankEntry,
    SHORT_RETURN_SESSIONS,
};
