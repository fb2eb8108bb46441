//! Search result types.

use crate::search::tree::SearchTree;

/// A root move with its search statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedMove {
    pub san: String,
    pub visits: u32,
    pub reward: f64,
    /// `reward / visits`, 0 if the move was never visited.
    pub win_rate: f64,
}

/// Result of a search operation.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// SAN of the top ranked move; `None` if the root has no legal moves.
    pub best_move: Option<String>,
    /// Root moves ordered by win rate, best first.
    pub ranked: Vec<RankedMove>,
    /// Simulations run.
    pub simulations: u32,
    /// Nodes in the tree.
    pub n_nodes: usize,
}

impl SearchResult {
    /// Creates a SearchResult from a searched tree.
    ///
    /// # Arguments
    ///
    /// * `tree` - The tree after all simulations.
    /// * `simulations` - Number of simulations that were run.
    pub fn from_tree(tree: &SearchTree, simulations: u32) -> Self {
        let ranked: Vec<RankedMove> = tree
            .ranked_children()
            .into_iter()
            .filter_map(|id| {
                let node = tree.node(id);
                node.san.clone().map(|san| RankedMove {
                    san,
                    visits: node.visits,
                    reward: node.reward,
                    win_rate: node.win_rate(),
                })
            })
            .collect();

        Self {
            best_move: ranked.first().map(|rm| rm.san.clone()),
            ranked,
            simulations,
            n_nodes: tree.len(),
        }
    }
}
