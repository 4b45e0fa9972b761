//! Per-player ranked statistics.
//!
//! Combines a player's raw statistics, their own leaderboard row and the
//! leaderboard size into one [`UserRankedStats`]. Each source is tracked
//! separately as a [`Loadable`]: once any source has produced something
//! the aggregate is available. Fields from the other sources keep their
//! last known value, or stay `None` until they arrive.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::calculate::resolve_rank;
use crate::fetch::FetchError;
use crate::models::{
    Loadable, PlayerId, PlayerPosition, PlayerStatistics, Season, UserRankedStats,
};
use crate::seasons::{
    best_win_streak_key_for_season, elo_stat_key_for_season, leaderboard_id_for_season,
    set_stats_for_season, SeasonError,
};

/// Backend queries behind a player's ranked view.
#[async_trait]
pub trait RankedDataSource: Send + Sync {
    async fn player_statistics(&self, player: &PlayerId) -> Result<PlayerStatistics, FetchError>;

    /// Rows around `player`; the first one is the player's own.
    async fn leaderboard_around_player(
        &self,
        leaderboard_id: &str,
        player: &PlayerId,
    ) -> Result<Vec<PlayerPosition>, FetchError>;

    /// Total number of ranked players on a leaderboard.
    async fn leaderboard_size(&self, leaderboard_id: &str) -> Result<usize, FetchError>;
}

/// Current state of each source feeding the aggregate.
#[derive(Debug, Clone, Default)]
pub struct RankedSources {
    pub statistics: Loadable<PlayerStatistics>,

    /// `Ready(None)` when the player has no row on the leaderboard
    pub position: Loadable<Option<PlayerPosition>>,

    pub player_count: Loadable<usize>,
}

impl RankedSources {
    fn any_loading(&self) -> bool {
        self.statistics.is_loading()
            || self.position.is_loading()
            || self.player_count.is_loading()
    }
}

/// Resolve the aggregate from whatever the sources have produced so far.
///
/// Fields whose source is still loading keep their value from `previous`.
/// Returns `Loading` while nothing usable is known and some source is still
/// pending, and `Failed` only when every source has settled without
/// producing anything. Fails when the season has no statistic mapping.
pub fn aggregate_ranked_stats(
    season: &Season,
    sources: &RankedSources,
    previous: Option<&UserRankedStats>,
) -> Result<Loadable<UserRankedStats>, SeasonError> {
    let elo_key = elo_stat_key_for_season(season.index)?;
    let streak_key = best_win_streak_key_for_season(season.index)?;

    let mut result = UserRankedStats::default();

    if let Some(stats) = sources.statistics.ready() {
        result.elo = stats.get(elo_key);
        result.best_win_streak = stats.get(streak_key);
        result.set_stats = set_stats_for_season(stats, season)?;
    }

    if let Some(Some(own)) = sources.position.ready() {
        result.position = Some(own.position);
        result.profile = Some(own.profile.clone());
    }

    result.player_count = sources.player_count.ready().copied();

    if let Some(known) = previous {
        if sources.statistics.is_loading() {
            result.elo = known.elo;
            result.best_win_streak = known.best_win_streak;
            result.set_stats = known.set_stats.clone();
        }
        if sources.position.is_loading() {
            result.position = known.position;
            result.profile = known.profile.clone();
        }
        if sources.player_count.is_loading() {
            result.player_count = known.player_count;
        }
    }

    result.rank = match (result.elo, result.position) {
        (Some(elo), Some(position)) => Some(resolve_rank(elo, position)),
        _ => None,
    };

    if !result.is_empty() {
        return Ok(Loadable::Ready(result));
    }

    if sources.any_loading() {
        return Ok(match previous {
            Some(known) => Loadable::Ready(known.clone()),
            None => Loadable::Loading,
        });
    }

    let failures: Vec<&str> = [
        failure_message(&sources.statistics),
        failure_message(&sources.position),
        failure_message(&sources.player_count),
    ]
    .into_iter()
    .flatten()
    .collect();

    if failures.is_empty() {
        Ok(Loadable::Ready(result))
    } else {
        Ok(Loadable::Failed(failures.join("; ")))
    }
}

fn failure_message<T>(source: &Loadable<T>) -> Option<&str> {
    match source {
        Loadable::Failed(message) => Some(message.as_str()),
        _ => None,
    }
}

fn settle<T>(name: &str, result: Result<T, FetchError>) -> Loadable<T> {
    if let Err(e) = &result {
        warn!("Ranked source {} failed: {}", name, e);
    }
    result.into()
}

/// Fetches and aggregates ranked statistics for a player.
pub struct RankedStatsService<S: RankedDataSource + ?Sized> {
    source: Arc<S>,
}

impl<S: RankedDataSource + ?Sized + 'static> RankedStatsService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Query every source concurrently and aggregate once all have settled.
    pub async fn user_ranked_stats(
        &self,
        player: &PlayerId,
        season: &Season,
    ) -> Result<Loadable<UserRankedStats>, SeasonError> {
        let leaderboard_id = leaderboard_id_for_season(season.index)?;

        let (statistics, around, size) = tokio::join!(
            self.source.player_statistics(player),
            self.source.leaderboard_around_player(leaderboard_id, player),
            self.source.leaderboard_size(leaderboard_id),
        );

        let sources = RankedSources {
            statistics: settle("statistics", statistics),
            position: settle("position", around.map(|rows| rows.into_iter().next())),
            player_count: settle("player count", size),
        };
        aggregate_ranked_stats(season, &sources, None)
    }

    /// Publish a fresh aggregate every time one source settles.
    ///
    /// The background task stops once all sources have settled or every
    /// receiver has been dropped.
    pub fn watch(
        &self,
        player: PlayerId,
        season: Season,
    ) -> watch::Receiver<Loadable<UserRankedStats>> {
        let (tx, rx) = watch::channel(Loadable::Loading);
        let source = Arc::clone(&self.source);

        tokio::spawn(async move {
            let leaderboard_id = match leaderboard_id_for_season(season.index) {
                Ok(id) => id,
                Err(e) => {
                    error!("{}", e);
                    let _ = tx.send(Loadable::Failed(e.to_string()));
                    return;
                }
            };

            let mut statistics = source.player_statistics(&player);
            let mut around = source.leaderboard_around_player(leaderboard_id, &player);
            let mut size = source.leaderboard_size(leaderboard_id);

            let mut sources = RankedSources::default();
            let mut previous: Option<UserRankedStats> = None;

            while sources.any_loading() {
                tokio::select! {
                    result = &mut statistics, if sources.statistics.is_loading() => {
                        sources.statistics = settle("statistics", result);
                    }
                    result = &mut around, if sources.position.is_loading() => {
                        sources.position =
                            settle("position", result.map(|rows| rows.into_iter().next()));
                    }
                    result = &mut size, if sources.player_count.is_loading() => {
                        sources.player_count = settle("player count", result);
                    }
                    _ = tx.closed() => return,
                }

                let update = match aggregate_ranked_stats(&season, &sources, previous.as_ref()) {
                    Ok(update) => update,
                    Err(e) => {
                        error!("{}", e);
                        let _ = tx.send(Loadable::Failed(e.to_string()));
                        return;
                    }
                };
                if let Loadable::Ready(stats) = &update {
                    previous = Some(stats.clone());
                }
                if tx.send(update).is_err() {
                    return;
                }
            }
        });

        rx
    }
}
