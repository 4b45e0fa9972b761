//! Leaderboard entries and player identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EloDistribution, RankDistribution};
use crate::calculate::{compute_elo_distribution, compute_rank_distribution, CalculateError};

/// Opaque backend identity of a player entity.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single row of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub identity: PlayerId,

    /// 1-based position, ascending as elo descends
    pub position: u32,

    pub elo: i64,
}

impl LeaderboardEntry {
    pub fn new(identity: impl Into<PlayerId>, position: u32, elo: i64) -> Self {
        Self {
            identity: identity.into(),
            position,
            elo,
        }
    }
}

/// Public profile attached to a leaderboard-around-player row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub entity_id: PlayerId,
    pub display_name: Option<String>,
}

/// A player's own row from a leaderboard-around-player query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub stat_value: i64,
    pub position: u32,
    pub profile: PlayerProfile,
}

/// A complete leaderboard captured at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub leaderboard_id: String,
    pub fetched_at: DateTime<Utc>,

    /// Sorted by descending elo
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardSnapshot {
    pub fn new(leaderboard_id: impl Into<String>, entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
            fetched_at: Utc::now(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest elo on the board, or 0 when empty.
    pub fn first_player_elo(&self) -> i64 {
        self.entries.iter().map(|e| e.elo).max().unwrap_or(0)
    }

    /// Lowest elo on the board, clamped so it never exceeds 0.
    pub fn last_player_elo(&self) -> i64 {
        self.entries.iter().map(|e| e.elo).min().unwrap_or(0).min(0)
    }

    pub fn rank_distribution(&self) -> RankDistribution {
        compute_rank_distribution(&self.entries)
    }

    /// Elo histogram spanning `[last_player_elo, first_player_elo]`.
    pub fn elo_distribution(&self, precision: i64) -> Result<EloDistribution, CalculateError> {
        compute_elo_distribution(
            &self.entries,
            self.first_player_elo(),
            self.last_player_elo(),
            precision,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(elos: &[i64]) -> LeaderboardSnapshot {
        let entries = elos
            .iter()
            .enumerate()
            .map(|(i, &elo)| LeaderboardEntry::new(format!("p{}", i), i as u32 + 1, elo))
            .collect();
        LeaderboardSnapshot::new("RANKED_S4_ELO", entries)
    }

    #[test]
    fn test_player_id_display_and_debug() {
        let id = PlayerId::from("ABC123");
        assert_eq!(format!("{}", id), "ABC123");
        assert_eq!(format!("{:?}", id), "PlayerId(ABC123)");
    }

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::from("xyz")).unwrap();
        assert_eq!(json, "\"xyz\"");
    }

    #[test]
    fn test_snapshot_elo_bounds() {
        let snap = snapshot(&[2162, 1400, 350]);
        assert_eq!(snap.first_player_elo(), 2162);
        assert_eq!(snap.last_player_elo(), 0);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn test_snapshot_negative_floor_kept() {
        let snap = snapshot(&[900, -100]);
        assert_eq!(snap.last_player_elo(), -100);
    }

    #[test]
    fn test_snapshot_empty_bounds() {
        let snap = snapshot(&[]);
        assert!(snap.is_empty());
        assert_eq!(snap.first_player_elo(), 0);
        assert_eq!(snap.last_player_elo(), 0);
    }
}
