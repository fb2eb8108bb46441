//! Preset search strengths.

/// Search effort of one difficulty level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Level {
    /// Number of MCTS simulations.
    pub simulations: u32,
    /// Plies of legal moves expanded when the tree is built.
    pub tree_depth: u32,
    /// Maximum plies played out in each rollout.
    pub rollout_depth: u32,
}

/// Level used when none is requested.
pub const DEFAULT_LEVEL: usize = 6;

/// Retrieves the configuration for a specific difficulty level.
///
/// # Arguments
///
/// * `lv` - The level index, where 0 is the weakest and 10 the strongest.
///
/// # Returns
///
/// `None` if `lv` is outside 0-10.
pub fn get_level(lv: usize) -> Option<Level> {
    LEVELS.get(lv).copied()
}

/// Number of defined levels.
pub const fn level_count() -> usize {
    LEVELS.len()
}

#[rustfmt::skip]
const LEVELS: [Level; 11] = [
    Level { simulations:    10, tree_depth: 1, rollout_depth:  4 },
    Level { simulations:    25, tree_depth: 1, rollout_depth:  6 },
    Level { simulations:    50, tree_depth: 1, rollout_depth:  8 },
    Level { simulations:   100, tree_depth: 1, rollout_depth: 10 },
    Level { simulations:   200, tree_depth: 1, rollout_depth: 15 },
    Level { simulations:   300, tree_depth: 1, rollout_depth: 20 },
    Level { simulations:   500, tree_depth: 1, rollout_depth: 30 },
    Level { simulations:   800, tree_depth: 1, rollout_depth: 30 },
    Level { simulations:  1200, tree_depth: 2, rollout_depth: 30 },
    Level { simulations:  2000, tree_depth: 2, rollout_depth: 40 },
    Level { simulations:  3000, tree_depth: 2, rollout_depth: 50 },
];
