//! Core data models for ranked statistics.

mod leaderboard;
mod loadable;
mod rank;
mod season;
mod stats;

pub use leaderboard::*;
pub use loadable::*;
pub use rank::*;
pub use season::*;
pub use stats::*;
