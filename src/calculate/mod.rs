//! Statistics calculation engine.
//!
//! Pure computations over an already fetched leaderboard:
//! - Rank resolution from elo and leaderboard position
//! - Per-rank population counts
//! - Elo histograms for charting

mod elo;
mod rank;

pub use elo::*;
pub use rank::*;

use thiserror::Error;

/// Errors raised by the calculators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculateError {
    #[error("Histogram precision must be positive, got {0}")]
    InvalidPrecision(i64),

    #[error("Elo range {min_elo}..={max_elo} at precision {precision} exceeds {max_buckets} buckets")]
    RangeTooWide {
        min_elo: i64,
        max_elo: i64,
        precision: i64,
        max_buckets: usize,
    },
}

/// Count of leading entries in a descending sequence that satisfy `above`.
///
/// `above` must hold for a prefix of `sorted` and fail for the rest.
pub fn count_leading<T, F>(sorted: &[T], above: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    sorted.partition_point(above)
}
