//! Season-aware statistic selection.
//!
//! The backend renamed ranked statistics from one season to the next, and
//! season 1 follows none of the later conventions. The table below lists
//! every supported season explicitly.

use thiserror::Error;

use crate::models::{PlayerStatistics, Season, SetStats, StatKey};

/// Raised when a season has no known statistic mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonError {
    #[error("{stat} stat name for season {season} does not exist")]
    UnknownSeason { season: u32, stat: &'static str },
}

/// Statistic names used by one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonStatKeys {
    pub season: u32,
    pub elo: StatKey,
    pub sets: StatKey,
    pub wins: StatKey,
    pub best_win_streak: StatKey,
}

const SEASON_STAT_KEYS: [SeasonStatKeys; 4] = [
    SeasonStatKeys {
        season: 1,
        elo: StatKey::RankedS1Elo,
        sets: StatKey::RankedSets,
        wins: StatKey::RankedWins,
        best_win_streak: StatKey::RankedBestWinStreak,
    },
    SeasonStatKeys {
        season: 2,
        elo: StatKey::RankedS2Elo,
        sets: StatKey::RankedS2Sets,
        wins: StatKey::RankedS2Wins,
        best_win_streak: StatKey::RankedS2BestWinStreak,
    },
    SeasonStatKeys {
        season: 3,
        elo: StatKey::RankedS3Elo,
        sets: StatKey::RankedS3Sets,
        wins: StatKey::RankedS3Wins,
        best_win_streak: StatKey::RankedS3BestWinStreak,
    },
    SeasonStatKeys {
        season: 4,
        elo: StatKey::RankedS4Elo,
        sets: StatKey::RankedS4Sets,
        wins: StatKey::RankedS4Wins,
        best_win_streak: StatKey::RankedS4BestWinStreak,
    },
];

/// All statistic names for a season.
pub fn stat_keys_for_season(
    season_index: u32,
    stat: &'static str,
) -> Result<SeasonStatKeys, SeasonError> {
    SEASON_STAT_KEYS
        .iter()
        .find(|keys| keys.season == season_index)
        .copied()
        .ok_or(SeasonError::UnknownSeason {
            season: season_index,
            stat,
        })
}

/// Statistic holding a season's elo.
pub fn elo_stat_key_for_season(season_index: u32) -> Result<StatKey, SeasonError> {
    stat_keys_for_season(season_index, "elo").map(|keys| keys.elo)
}

/// Statistic holding a season's best win streak.
pub fn best_win_streak_key_for_season(season_index: u32) -> Result<StatKey, SeasonError> {
    stat_keys_for_season(season_index, "best win streak").map(|keys| keys.best_win_streak)
}

/// Leaderboard a season is ranked on, named after its elo statistic.
pub fn leaderboard_id_for_season(season_index: u32) -> Result<&'static str, SeasonError> {
    elo_stat_key_for_season(season_index).map(StatKey::as_str)
}

/// Set and win totals for a season.
///
/// Only the first and the active season keep set counts; any season in
/// between yields `Ok(None)`. A season without a mapping is an error.
/// Missing set or win statistics also yield `Ok(None)`.
pub fn set_stats_for_season(
    stats: &PlayerStatistics,
    season: &Season,
) -> Result<Option<SetStats>, SeasonError> {
    let keys = stat_keys_for_season(season.index, "set")?;
    if season.is_retired_mid_season() {
        return Ok(None);
    }

    let set_stats = match (stats.get(keys.sets), stats.get(keys.wins)) {
        (Some(set_count), Some(win_count)) => Some(SetStats::new(set_count, win_count)),
        _ => None,
    };
    Ok(set_stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_elo_key_per_season() {
        assert_eq!(elo_stat_key_for_season(1), Ok(StatKey::RankedS1Elo));
        assert_eq!(elo_stat_key_for_season(2), Ok(StatKey::RankedS2Elo));
        assert_eq!(elo_stat_key_for_season(4), Ok(StatKey::RankedS4Elo));
    }

    #[test]
    fn test_season_one_uses_unprefixed_set_names() {
        let keys = stat_keys_for_season(1, "set").unwrap();
        assert_eq!(keys.sets, StatKey::RankedSets);
        assert_eq!(keys.wins, StatKey::RankedWins);
    }

    #[test]
    fn test_selects_elo_of_requested_season() {
        let stats = PlayerStatistics::new()
            .with(StatKey::RankedS1Elo, 815)
            .with(StatKey::RankedS2Elo, 900)
            .with(StatKey::RankedS4Elo, 950);

        let key = elo_stat_key_for_season(4).unwrap();
        assert_eq!(stats.get(key), Some(950));
    }

    #[test]
    fn test_unknown_season_fails_loudly() {
        let err = elo_stat_key_for_season(5).unwrap_err();
        assert_eq!(err, SeasonError::UnknownSeason { season: 5, stat: "elo" });
        assert_eq!(err.to_string(), "elo stat name for season 5 does not exist");
        assert!(elo_stat_key_for_season(0).is_err());
    }

    #[test]
    fn test_leaderboard_id_for_season() {
        assert_eq!(leaderboard_id_for_season(3), Ok("RANKED_S3_ELO"));
    }

    #[test]
    fn test_set_stats_unavailable_mid_season() {
        let stats = PlayerStatistics::new()
            .with(StatKey::RankedS2Sets, 10)
            .with(StatKey::RankedS2Wins, 4);
        let season = Season::new(2, "Season 2", 4);

        assert_eq!(set_stats_for_season(&stats, &season), Ok(None));
    }

    #[test]
    fn test_set_stats_zero_sets_in_active_season() {
        let stats = PlayerStatistics::new()
            .with(StatKey::RankedS4Sets, 0)
            .with(StatKey::RankedS4Wins, 0);
        let season = Season::new(4, "Season 4", 4);

        assert_eq!(
            set_stats_for_season(&stats, &season),
            Ok(Some(SetStats {
                set_count: 0,
                win_count: 0,
                win_rate: 0.0,
            }))
        );
    }

    #[test]
    fn test_set_stats_first_season() {
        let stats = PlayerStatistics::new()
            .with(StatKey::RankedSets, 20)
            .with(StatKey::RankedWins, 15);
        let season = Season::new(1, "Season 1", 4);

        let set_stats = set_stats_for_season(&stats, &season).unwrap().unwrap();
        assert_eq!(set_stats.set_count, 20);
        assert_eq!(set_stats.win_count, 15);
        assert!((set_stats.win_rate - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_stats_missing_keys() {
        let stats = PlayerStatistics::new().with(StatKey::RankedS4Sets, 3);
        let season = Season::new(4, "Season 4", 4);
        assert_eq!(set_stats_for_season(&stats, &season), Ok(None));
    }

    #[test]
    fn test_set_stats_unknown_season_errors_even_mid_range() {
        let season = Season::new(7, "Season 7", 9);
        assert!(set_stats_for_season(&PlayerStatistics::new(), &season).is_err());
    }
}
