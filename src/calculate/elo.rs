use crate::models::{EloBucket, EloDistribution, LeaderboardEntry};

use super::CalculateError;

/// Largest histogram the calculator will build.
pub const MAX_ELO_BUCKETS: usize = 100_000;

/// Round an elo down to the nearest multiple of `precision`.
///
/// Rounds toward negative infinity, so -5 at precision 10 lands in -10.
pub fn bucket_for(elo: i64, precision: i64) -> i64 {
    elo.div_euclid(precision) * precision
}

/// Build an elo histogram for charting.
///
/// Buckets run in ascending order from `bucket_for(last_player_elo)` to
/// `bucket_for(first_player_elo)` with zero-count buckets filling gaps. The
/// range is widened if an entry falls outside it. An empty leaderboard
/// yields an empty distribution. Ranges needing more than
/// [`MAX_ELO_BUCKETS`] buckets are rejected.
pub fn compute_elo_distribution(
    leaderboard: &[LeaderboardEntry],
    first_player_elo: i64,
    last_player_elo: i64,
    precision: i64,
) -> Result<EloDistribution, CalculateError> {
    if precision <= 0 {
        return Err(CalculateError::InvalidPrecision(precision));
    }
    if leaderboard.is_empty() {
        return Ok(EloDistribution::default());
    }

    let (min_elo, max_elo) = leaderboard
        .iter()
        .fold((last_player_elo, first_player_elo), |(lo, hi), entry| {
            (lo.min(entry.elo), hi.max(entry.elo))
        });
    let (lowest, bucket_count) = bucket_span(min_elo, max_elo, precision).ok_or(
        CalculateError::RangeTooWide {
            min_elo,
            max_elo,
            precision,
            max_buckets: MAX_ELO_BUCKETS,
        },
    )?;

    let mut counts = vec![0usize; bucket_count];
    for entry in leaderboard {
        let index = (bucket_for(entry.elo, precision) - lowest) / precision;
        counts[index as usize] += 1;
    }

    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(i, value)| EloBucket {
            elo: lowest + i as i64 * precision,
            value,
        })
        .collect();

    Ok(EloDistribution::new(buckets))
}

/// Lowest bucket and bucket count for `min_elo..=max_elo`, `None` when the
/// range overflows or needs more than `MAX_ELO_BUCKETS` buckets.
fn bucket_span(min_elo: i64, max_elo: i64, precision: i64) -> Option<(i64, usize)> {
    let lowest = min_elo.checked_sub(min_elo.rem_euclid(precision))?;
    let highest = max_elo - max_elo.rem_euclid(precision);
    let steps = usize::try_from(highest.checked_sub(lowest)? / precision).ok()?;
    let count = steps.checked_add(1)?;
    (count <= MAX_ELO_BUCKETS).then_some((lowest, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board(elos: &[i64]) -> Vec<LeaderboardEntry> {
        elos.iter()
            .enumerate()
            .map(|(i, &elo)| LeaderboardEntry::new(format!("player-{}", i), i as u32 + 1, elo))
            .collect()
    }

    #[test]
    fn test_bucket_for_rounds_down() {
        assert_eq!(bucket_for(2162, 10), 2160);
        assert_eq!(bucket_for(2160, 10), 2160);
        assert_eq!(bucket_for(0, 10), 0);
        assert_eq!(bucket_for(-5, 10), -10);
        assert_eq!(bucket_for(-100, 10), -100);
        assert_eq!(bucket_for(-101, 10), -110);
    }

    #[test]
    fn test_elo_distribution_has_no_gaps() {
        let leaderboard = board(&[2162, 1837, 1791, 920, -100]);
        let dist = compute_elo_distribution(&leaderboard, 2162, -100, 10).unwrap();

        let expected_len = ((2162 - (-100) + 1) as f64 / 10.0).ceil() as usize;
        assert_eq!(dist.len(), expected_len);
        assert!(dist
            .buckets()
            .windows(2)
            .all(|w| w[1].elo - w[0].elo == 10));
        assert_eq!(dist.buckets()[0].elo, -100);
        assert_eq!(dist.buckets()[dist.len() - 1].elo, 2160);
        assert_eq!(dist.get(1000), Some(0));
        assert_eq!(dist.get(920), Some(1));
        assert_eq!(dist.total(), leaderboard.len());
    }

    #[test]
    fn test_elo_distribution_includes_zero_bucket() {
        let leaderboard = board(&[1240, 1210, 1205]);
        let dist = compute_elo_distribution(&leaderboard, 1240, 0, 100).unwrap();

        let elos: Vec<i64> = dist.buckets().iter().map(|b| b.elo).collect();
        assert_eq!(elos, (0..=1200).step_by(100).collect::<Vec<i64>>());
        assert_eq!(dist.get(0), Some(0));
        assert_eq!(dist.get(1200), Some(3));
    }

    #[test]
    fn test_elo_distribution_negative_elo_rounds_down() {
        let leaderboard = board(&[5, -5]);
        let dist = compute_elo_distribution(&leaderboard, 5, -5, 10).unwrap();
        assert_eq!(
            dist.buckets(),
            &[
                EloBucket { elo: -10, value: 1 },
                EloBucket { elo: 0, value: 1 },
            ]
        );
    }

    #[test]
    fn test_elo_distribution_widens_to_entries() {
        let leaderboard = board(&[300, 120]);
        let dist = compute_elo_distribution(&leaderboard, 200, 150, 50).unwrap();
        assert_eq!(dist.buckets()[0].elo, 100);
        assert_eq!(dist.buckets()[dist.len() - 1].elo, 300);
        assert_eq!(dist.total(), 2);
    }

    #[test]
    fn test_elo_distribution_empty() {
        let dist = compute_elo_distribution(&[], 0, 0, 10).unwrap();
        assert!(dist.is_empty());
    }

    #[test]
    fn test_elo_distribution_rejects_extreme_scores() {
        for elos in [vec![i64::MAX, 0], vec![i64::MIN], vec![i64::MAX, i64::MIN]] {
            let leaderboard = board(&elos);
            let first = elos.iter().copied().max().unwrap_or(0);
            let last = elos.iter().copied().min().unwrap_or(0).min(0);
            assert!(matches!(
                compute_elo_distribution(&leaderboard, first, last, 10),
                Err(CalculateError::RangeTooWide { .. })
            ));
        }
    }

    #[test]
    fn test_elo_distribution_bucket_limit() {
        let widest = (MAX_ELO_BUCKETS as i64 - 1) * 10;
        let at_limit = compute_elo_distribution(&board(&[widest, 0]), widest, 0, 10).unwrap();
        assert_eq!(at_limit.len(), MAX_ELO_BUCKETS);

        let over = widest + 10;
        assert!(matches!(
            compute_elo_distribution(&board(&[over, 0]), over, 0, 10),
            Err(CalculateError::RangeTooWide { .. })
        ));
    }

    #[test]
    fn test_elo_distribution_rejects_bad_precision() {
        let leaderboard = board(&[100]);
        assert_eq!(
            compute_elo_distribution(&leaderboard, 100, 0, 0),
            Err(CalculateError::InvalidPrecision(0))
        );
        assert!(compute_elo_distribution(&leaderboard, 100, 0, -10).is_err());
    }
}
