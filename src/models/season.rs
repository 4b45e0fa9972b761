//! Ranked season descriptor.

use serde::{Deserialize, Serialize};

/// The ranked season currently selected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// 1-based season index
    pub index: u32,

    pub name: String,

    /// Whether this is the very first ranked season
    pub is_first: bool,

    /// Whether this is the active (most recent) season
    pub is_last: bool,
}

impl Season {
    /// Build the descriptor for `index` given the active season index.
    pub fn new(index: u32, name: impl Into<String>, current: u32) -> Self {
        Self {
            index,
            name: name.into(),
            is_first: index == 1,
            is_last: index == current,
        }
    }

    /// Neither the first nor the active season.
    pub fn is_retired_mid_season(&self) -> bool {
        !self.is_first && !self.is_last
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_flags() {
        let first = Season::new(1, "Season 1", 4);
        assert!(first.is_first);
        assert!(!first.is_last);

        let active = Season::new(4, "Season 4", 4);
        assert!(!active.is_first);
        assert!(active.is_last);

        let mid = Season::new(3, "Season 3", 4);
        assert!(mid.is_retired_mid_season());
    }

    #[test]
    fn test_single_season_is_first_and_last() {
        let only = Season::new(1, "Season 1", 1);
        assert!(only.is_first && only.is_last);
        assert!(!only.is_retired_mid_season());
    }
}
