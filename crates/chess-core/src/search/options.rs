use std::f64::consts::SQRT_2;

use crate::level::Level;

/// Exploration constant of the UCT formula.
pub const DEFAULT_EXPLORATION: f64 = SQRT_2;

/// Parameters of a Monte Carlo search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOptions {
    /// Number of simulations to run.
    pub simulations: u32,
    /// Plies expanded when the tree is built.
    pub tree_depth: u32,
    /// Maximum plies played out by each rollout.
    pub rollout_depth: u32,
    /// Weight of the exploration term in UCT.
    pub exploration: f64,
    /// Softmax temperature of rollout move sampling; 0 or less plays the
    /// best scored move.
    pub temperature: f64,
    /// Seed of the random generator. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl SearchOptions {
    /// Create search options with the given simulation count and defaults for
    /// everything else.
    #[must_use]
    pub fn new(simulations: u32) -> Self {
        SearchOptions {
            simulations,
            ..Default::default()
        }
    }

    /// Create search options matching a preset difficulty level.
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        SearchOptions {
            simulations: level.simulations,
            tree_depth: level.tree_depth,
            rollout_depth: level.rollout_depth,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_simulations(mut self, simulations: Option<u32>) -> Self {
        if let Some(value) = simulations {
            self.simulations = value;
        }
        self
    }

    /// Sets the plies expanded before the first simulation; at least one.
    #[must_use]
    pub fn with_tree_depth(mut self, tree_depth: Option<u32>) -> Self {
        if let Some(value) = tree_depth {
            self.tree_depth = value.max(1);
        }
        self
    }

    #[must_use]
    pub fn with_rollout_depth(mut self, rollout_depth: Option<u32>) -> Self {
        if let Some(value) = rollout_depth {
            self.rollout_depth = value;
        }
        self
    }

    #[must_use]
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        if let Some(value) = temperature {
            self.temperature = value;
        }
        self
    }

    /// Fix the random seed so that repeated searches of the same position
    /// return identical results.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            simulations: 500,
            tree_depth: 1,
            rollout_depth: 30,
            exploration: DEFAULT_EXPLORATION,
            temperature: 1.0,
            seed: None,
        }
    }
}
