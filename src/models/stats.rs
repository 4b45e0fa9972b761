//! Player statistics and derived distribution models.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{PlayerProfile, Rank};

/// Raw backend statistic names the ranked views read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatKey {
    RankedS1Elo,
    RankedSets,
    RankedWins,
    RankedBestWinStreak,
    RankedS2Elo,
    RankedS2Sets,
    RankedS2Wins,
    RankedS2BestWinStreak,
    RankedS3Elo,
    RankedS3Sets,
    RankedS3Wins,
    RankedS3BestWinStreak,
    RankedS4Elo,
    RankedS4Sets,
    RankedS4Wins,
    RankedS4BestWinStreak,
}

impl StatKey {
    pub const ALL: [StatKey; 16] = [
        StatKey::RankedS1Elo,
        StatKey::RankedSets,
        StatKey::RankedWins,
        StatKey::RankedBestWinStreak,
        StatKey::RankedS2Elo,
        StatKey::RankedS2Sets,
        StatKey::RankedS2Wins,
        StatKey::RankedS2BestWinStreak,
        StatKey::RankedS3Elo,
        StatKey::RankedS3Sets,
        StatKey::RankedS3Wins,
        StatKey::RankedS3BestWinStreak,
        StatKey::RankedS4Elo,
        StatKey::RankedS4Sets,
        StatKey::RankedS4Wins,
        StatKey::RankedS4BestWinStreak,
    ];

    /// Backend statistic name.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::RankedS1Elo => "RANKED_S1_ELO",
            StatKey::RankedSets => "RANKED_SETS",
            StatKey::RankedWins => "RANKED_WINS",
            StatKey::RankedBestWinStreak => "RANKED_BEST_WIN_STREAK",
            StatKey::RankedS2Elo => "RANKED_S2_ELO",
            StatKey::RankedS2Sets => "RANKED_S2_SETS",
            StatKey::RankedS2Wins => "RANKED_S2_WINS",
            StatKey::RankedS2BestWinStreak => "RANKED_S2_BEST_WIN_STREAK",
            StatKey::RankedS3Elo => "RANKED_S3_ELO",
            StatKey::RankedS3Sets => "RANKED_S3_SETS",
            StatKey::RankedS3Wins => "RANKED_S3_WINS",
            StatKey::RankedS3BestWinStreak => "RANKED_S3_BEST_WIN_STREAK",
            StatKey::RankedS4Elo => "RANKED_S4_ELO",
            StatKey::RankedS4Sets => "RANKED_S4_SETS",
            StatKey::RankedS4Wins => "RANKED_S4_WINS",
            StatKey::RankedS4BestWinStreak => "RANKED_S4_BEST_WIN_STREAK",
        }
    }
}

impl std::fmt::Display for StatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown statistic name: {}", s))
    }
}

/// Sparse statistic values for one player. Absent keys are not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStatistics(HashMap<StatKey, i64>);

impl PlayerStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: StatKey) -> Option<i64> {
        self.0.get(&key).copied()
    }

    pub fn insert(&mut self, key: StatKey, value: i64) {
        self.0.insert(key, value);
    }

    pub fn with(mut self, key: StatKey, value: i64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(StatKey, i64)> for PlayerStatistics {
    fn from_iter<I: IntoIterator<Item = (StatKey, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Set and win totals for a season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetStats {
    pub set_count: i64,
    pub win_count: i64,

    /// Percentage in `[0, 100]`, 0 when no sets were played
    pub win_rate: f64,
}

impl SetStats {
    pub fn new(set_count: i64, win_count: i64) -> Self {
        let win_rate = if set_count > 0 {
            win_count as f64 / set_count as f64 * 100.0
        } else {
            0.0
        };
        Self {
            set_count,
            win_count,
            win_rate,
        }
    }
}

/// Display-ready ranked statistics for one player and season.
///
/// Each field is independently optional: a missing source leaves its
/// fields `None` without hiding the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRankedStats {
    pub elo: Option<i64>,
    pub rank: Option<Rank>,
    pub best_win_streak: Option<i64>,
    pub position: Option<u32>,
    pub player_count: Option<usize>,
    pub set_stats: Option<SetStats>,
    pub profile: Option<PlayerProfile>,
}

impl UserRankedStats {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.elo.is_none()
            && self.rank.is_none()
            && self.best_win_streak.is_none()
            && self.position.is_none()
            && self.player_count.is_none()
            && self.set_stats.is_none()
            && self.profile.is_none()
    }
}

/// Number of leaderboard entries per rank. Every rank is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankDistribution(BTreeMap<Rank, usize>);

impl RankDistribution {
    /// Distribution with every rank mapped to zero.
    pub fn zeroed() -> Self {
        Self(Rank::ALL.iter().map(|&rank| (rank, 0)).collect())
    }

    pub fn get(&self, rank: Rank) -> usize {
        self.0.get(&rank).copied().unwrap_or(0)
    }

    pub fn set(&mut self, rank: Rank, count: usize) {
        self.0.insert(rank, count);
    }

    pub fn add(&mut self, rank: Rank, count: usize) {
        *self.0.entry(rank).or_insert(0) += count;
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Ranks with their counts, lowest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, usize)> + '_ {
        self.0.iter().map(|(&rank, &count)| (rank, count))
    }
}

impl Default for RankDistribution {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// One histogram bar: entries whose elo rounds down to `elo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloBucket {
    pub elo: i64,
    pub value: usize,
}

/// Elo histogram in ascending bucket order with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EloDistribution(Vec<EloBucket>);

impl EloDistribution {
    pub fn new(buckets: Vec<EloBucket>) -> Self {
        Self(buckets)
    }

    pub fn buckets(&self) -> &[EloBucket] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count for the bucket starting at `elo`, if the bucket exists.
    pub fn get(&self, elo: i64) -> Option<usize> {
        self.0
            .binary_search_by_key(&elo, |bucket| bucket.elo)
            .ok()
            .map(|i| self.0[i].value)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|bucket| bucket.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_key_names_round_trip() {
        for key in StatKey::ALL {
            assert_eq!(key.as_str().parse::<StatKey>().unwrap(), key);
        }
        assert!("RANKED_S9_ELO".parse::<StatKey>().is_err());
    }

    #[test]
    fn test_stat_key_serde_matches_backend_name() {
        for key in StatKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_player_statistics_absent_is_none() {
        let stats = PlayerStatistics::new().with(StatKey::RankedS4Elo, 0);
        assert_eq!(stats.get(StatKey::RankedS4Elo), Some(0));
        assert_eq!(stats.get(StatKey::RankedS4Sets), None);
    }

    #[test]
    fn test_set_stats_win_rate() {
        let stats = SetStats::new(40, 30);
        assert!((stats.win_rate - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_stats_zero_sets() {
        let stats = SetStats::new(0, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert!(!stats.win_rate.is_nan());
    }

    #[test]
    fn test_user_ranked_stats_empty() {
        assert!(UserRankedStats::default().is_empty());
        let partial = UserRankedStats {
            player_count: Some(12),
            ..Default::default()
        };
        assert!(!partial.is_empty());
    }

    #[test]
    fn test_rank_distribution_zeroed_has_all_ranks() {
        let dist = RankDistribution::zeroed();
        assert_eq!(dist.iter().count(), 9);
        assert_eq!(dist.total(), 0);
    }

    #[test]
    fn test_rank_distribution_serializes_every_rank() {
        let json = serde_json::to_value(RankDistribution::zeroed()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 9);
        assert_eq!(obj["AETHEREAN"], 0);
    }

    #[test]
    fn test_elo_distribution_lookup() {
        let dist = EloDistribution::new(vec![
            EloBucket { elo: -10, value: 1 },
            EloBucket { elo: 0, value: 0 },
            EloBucket { elo: 10, value: 3 },
        ]);
        assert_eq!(dist.get(10), Some(3));
        assert_eq!(dist.get(0), Some(0));
        assert_eq!(dist.get(20), None);
        assert_eq!(dist.total(), 4);
    }
}
