//! Rank tiers and their elo boundaries.

use serde::{Deserialize, Serialize};

/// Only this many players (by leaderboard position) may hold the top tier.
pub const MAX_AETHEREAN_PLAYERS: u32 = 100;

/// Ranked tier, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Stone,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Aetherean,
}

impl Rank {
    /// Every tier in ascending order.
    pub const ALL: [Rank; 9] = [
        Rank::Stone,
        Rank::Bronze,
        Rank::Silver,
        Rank::Gold,
        Rank::Platinum,
        Rank::Diamond,
        Rank::Master,
        Rank::Grandmaster,
        Rank::Aetherean,
    ];

    /// Highest tier, additionally gated by leaderboard position.
    pub const TOP: Rank = Rank::Aetherean;

    /// Minimum elo for this tier. `None` means negative infinity.
    pub fn min_elo(self) -> Option<i64> {
        match self {
            Rank::Stone => None,
            Rank::Bronze => Some(500),
            Rank::Silver => Some(700),
            Rank::Gold => Some(900),
            Rank::Platinum => Some(1100),
            Rank::Diamond => Some(1300),
            Rank::Master => Some(1500),
            Rank::Grandmaster => Some(1700),
            Rank::Aetherean => Some(1800),
        }
    }

    /// Inclusive elo interval covered by this tier.
    pub fn interval(self) -> RankEloInterval {
        RankEloInterval {
            min: self.min_elo(),
            max: self.next().and_then(Rank::min_elo).map(|next_min| next_min - 1),
        }
    }

    /// Position in the tier ordering, starting at 0 for stone.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The tier directly above, if any.
    pub fn next(self) -> Option<Rank> {
        Rank::ALL.get(self.ordinal() + 1).copied()
    }

    /// The tier directly below, if any.
    pub fn previous(self) -> Option<Rank> {
        self.ordinal().checked_sub(1).map(|i| Rank::ALL[i])
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rank::Stone => "Stone",
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
            Rank::Diamond => "Diamond",
            Rank::Master => "Master",
            Rank::Grandmaster => "Grandmaster",
            Rank::Aetherean => "Aetherean",
        };
        write!(f, "{}", name)
    }
}

/// Inclusive `[min, max]` elo range for a tier. `None` bounds are infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEloInterval {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RankEloInterval {
    /// Check whether an elo falls inside the interval, both bounds inclusive.
    pub fn contains(&self, elo: i64) -> bool {
        self.min.map_or(true, |min| elo >= min) && self.max.map_or(true, |max| elo <= max)
    }
}
