//! # Ranked Stats
//!
//! Ranked ladder statistics for a competitive game's companion app.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (ranks, leaderboard entries, seasons, stats)
//! - **calculate**: Rank resolution and leaderboard distributions
//! - **seasons**: Season-aware statistic selection
//! - **fetch**: Paginated leaderboard retrieval and the backend HTTP client
//! - **aggregate**: Per-player ranked statistics from several sources
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod seasons;

pub use models::*;
