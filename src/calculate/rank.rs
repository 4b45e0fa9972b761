use crate::models::{LeaderboardEntry, Rank, RankDistribution, MAX_AETHEREAN_PLAYERS};

use super::count_leading;

/// Resolve the rank for an elo at a given leaderboard position.
///
/// Top-tier elo beyond the position cap resolves to grandmaster.
pub fn resolve_rank(elo: i64, leaderboard_position: u32) -> Rank {
    let by_elo = Rank::ALL
        .iter()
        .rev()
        .copied()
        .find(|rank| rank.interval().contains(elo))
        .unwrap_or(Rank::Stone);

    if by_elo == Rank::TOP && leaderboard_position > MAX_AETHEREAN_PLAYERS {
        Rank::Grandmaster
    } else {
        by_elo
    }
}

/// Count leaderboard entries per rank.
///
/// `leaderboard` must be sorted by descending elo. Each tier boundary is
/// located with a binary search, and entries past the top-tier position
/// cap are counted as grandmaster.
pub fn compute_rank_distribution(leaderboard: &[LeaderboardEntry]) -> RankDistribution {
    let mut distribution = RankDistribution::zeroed();

    // Number of entries at or above each tier's floor.
    let at_or_above = |rank: Rank| match rank.min_elo() {
        Some(min) => count_leading(leaderboard, |entry| entry.elo >= min),
        None => leaderboard.len(),
    };

    let mut upper_split = 0;
    for rank in Rank::ALL.iter().rev().copied() {
        let split = at_or_above(rank);
        distribution.set(rank, split.saturating_sub(upper_split));
        upper_split = split;
    }

    let qualified = distribution.get(Rank::TOP);
    let capped = qualified.min(MAX_AETHEREAN_PLAYERS as usize);
    distribution.set(Rank::TOP, capped);
    distribution.add(Rank::Grandmaster, qualified - capped);

    distribution
}
