//! Monte Carlo Tree Search move ranking.
//!
//! One simulation walks the pre-built tree by UCT, picks a node to simulate
//! from, plays a rollout with softmax sampled moves and adds the reward to
//! every node on the way back to the root. Rewards are measured for the side
//! to move at the root.

mod options;
mod search_result;
mod tree;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::colour::Colour;
use crate::eval;
use crate::game::{Game, GameResult};
use crate::move_list::MoveList;

pub use options::{DEFAULT_EXPLORATION, SearchOptions};
pub use search_result::{RankedMove, SearchResult};
pub use tree::{NodeId, SearchNode, SearchTree, uct_value};

/// Scale applied to the static score before squashing it into a reward.
const EVAL_REWARD_SCALE: f64 = 10.0;

/// Monte Carlo search with its own random generator.
pub struct MonteCarloSearch {
    options: SearchOptions,
    rng: StdRng,
}

impl MonteCarloSearch {
    /// Creates a search; a seed in `options` makes it deterministic.
    pub fn new(options: &SearchOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        MonteCarloSearch {
            options: options.clone(),
            rng,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Builds a tree for `game`, runs the configured number of simulations
    /// and ranks the root moves.
    pub fn run(&mut self, game: &Game) -> SearchResult {
        let mut tree = SearchTree::with_depth(game.clone(), self.options.tree_depth);
        self.run_simulations(&mut tree, self.options.simulations);

        let result = SearchResult::from_tree(&tree, self.options.simulations);
        debug!(
            simulations = result.simulations,
            nodes = result.n_nodes,
            best_move = ?result.best_move,
            "search finished"
        );
        result
    }

    /// Runs `count` simulations on an existing tree.
    pub fn run_simulations(&mut self, tree: &mut SearchTree, count: u32) {
        for _ in 0..count {
            self.simulate(tree);
        }
    }

    /// Runs a single selection, expansion, rollout and backpropagation pass.
    pub fn simulate(&mut self, tree: &mut SearchTree) {
        let selected = tree.select(self.options.exploration);
        let target = self.expansion_target(tree, selected);
        let reward = self.rollout(&tree.node(target).game, tree.perspective());
        trace!(node = target.index(), reward, "simulation");
        tree.backpropagate(target, reward);
    }

    /// The node a rollout starts from: `id` itself if it has no children,
    /// else its first unvisited child, else a uniformly random child.
    fn expansion_target(&mut self, tree: &SearchTree, id: NodeId) -> NodeId {
        let children = tree.children(id);
        if children.is_empty() {
            return id;
        }
        if let Some(&unvisited) = children.iter().find(|&&child| tree.node(child).visits == 0) {
            return unvisited;
        }
        children[self.rng.random_range(0..children.len())]
    }

    /// Plays `game` forward on a copy and scores the final position.
    fn rollout(&mut self, game: &Game, perspective: Colour) -> f64 {
        let mut game = game.clone();
        for _ in 0..self.options.rollout_depth {
            if game.is_over() {
                break;
            }
            let moves = game.legal_moves();
            let index = self.sample_move(&moves, game.side_to_move());
            let Some(mv) = moves.into_iter().nth(index) else {
                break;
            };
            game.make_move(mv);
        }
        rollout_reward(&game, perspective)
    }

    /// Picks a move index by softmax over the static scores of the
    /// resulting positions for the mover.
    fn sample_move(&mut self, moves: &MoveList, mover: Colour) -> usize {
        let scores: Vec<f64> = moves
            .iter()
            .map(|mv| eval::evaluate(&mv.board, mover))
            .collect();
        let temperature = self.options.temperature;
        if temperature <= 0.0 {
            return argmax(&scores);
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = scores
            .iter()
            .map(|score| ((score - max) / temperature).exp())
            .collect();
        let total: f64 = weights.iter().sum();

        let mut threshold = self.rng.random::<f64>() * total;
        for (index, weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold < 0.0 {
                return index;
            }
        }
        weights.len().saturating_sub(1)
    }
}

/// Reward of a rollout's final position for `perspective`.
///
/// A finished game scores 1 for a win, 0 for a loss and 0.5 for a draw; an
/// unfinished one is squashed from the static evaluation into (0, 1).
pub fn rollout_reward(game: &Game, perspective: Colour) -> f64 {
    match game.result() {
        GameResult::Ongoing => {
            let score = eval::evaluate(game.board(), perspective);
            0.5 + 0.5 * (score / EVAL_REWARD_SCALE).tanh()
        }
        GameResult::Draw => 0.5,
        result => {
            if result.winner() == Some(perspective) {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Searches `game` and returns its ranked moves.
///
/// # Arguments
///
/// * `game` - The position to search; it is not modified.
/// * `options` - Simulation count, depths, temperature and seed.
pub fn search(game: &Game, options: &SearchOptions) -> SearchResult {
    MonteCarloSearch::new(options).run(game)
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(simulations: u32, rollout_depth: u32) -> SearchOptions {
        SearchOptions::new(simulations)
            .with_rollout_depth(Some(rollout_depth))
            .with_seed(Some(42))
    }

    #[test]
    fn test_rollout_reward_terminal() {
        let white_won = Game::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert_eq!(rollout_reward(&white_won, Colour::White), 1.0);
        assert_eq!(rollout_reward(&white_won, Colour::Black), 0.0);

        let stalemate = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(rollout_reward(&stalemate, Colour::White), 0.5);
    }

    #[test]
    fn test_rollout_reward_cutoff() {
        let game = Game::new();
        assert!((rollout_reward(&game, Colour::White) - 0.5).abs() < 1e-9);

        let up_a_rook = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let reward = rollout_reward(&up_a_rook, Colour::White);
        assert!(reward > 0.5 && reward < 1.0);
        let mirrored = rollout_reward(&up_a_rook, Colour::Black);
        assert!((reward + mirrored - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_argmax_keeps_first_maximum() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[5.0]), 0);
    }

    #[test]
    fn test_greedy_sampling_picks_best_capture() {
        // Taking the queen is by far the best scored successor.
        let game = Game::from_fen("4k3/8/8/8/8/8/3q4/3RK3 w - - 0 1").unwrap();
        let mut search = MonteCarloSearch::new(&options(1, 1).with_temperature(Some(0.0)));
        let moves = game.legal_moves();
        let index = search.sample_move(&moves, Colour::White);
        assert!(moves.get(index).unwrap().is_capture);
        assert_eq!(moves.get(index).unwrap().to, crate::Square::D2);
    }

    #[test]
    fn test_softmax_sampling_favours_better_moves() {
        let game = Game::from_fen("4k3/8/8/8/8/8/3q4/3RK3 w - - 0 1").unwrap();
        let moves = game.legal_moves();
        let scores: Vec<f64> = moves
            .iter()
            .map(|mv| eval::evaluate(&mv.board, Colour::White))
            .collect();
        let best = argmax(&scores);
        let worst = (0..scores.len())
            .min_by(|&a, &b| scores[a].total_cmp(&scores[b]))
            .unwrap();
        assert_ne!(best, worst);

        let mut search = MonteCarloSearch::new(&options(1, 1).with_temperature(Some(20.0)));
        let mut picks = vec![0u32; moves.count()];
        for _ in 0..400 {
            picks[search.sample_move(&moves, Colour::White)] += 1;
        }

        assert!(picks[best] > picks[worst]);
        assert!(picks[worst] > 0);
        assert!(picks[best] < 400);
    }

    #[test]
    fn test_expansion_target() {
        let mut search = MonteCarloSearch::new(&options(1, 0));
        let mut tree = SearchTree::with_depth(Game::new(), 1);
        let children = tree.children(tree.root()).to_vec();

        assert_eq!(search.expansion_target(&tree, children[0]), children[0]);
        assert_eq!(search.expansion_target(&tree, tree.root()), children[0]);

        for &child in &children {
            tree.backpropagate(child, 0.5);
        }
        let random = search.expansion_target(&tree, tree.root());
        assert!(children.contains(&random));
    }

    #[test]
    fn test_root_visits_equal_simulations() {
        let mut search = MonteCarloSearch::new(&options(25, 1));
        let mut tree = SearchTree::with_depth(Game::new(), 1);
        search.run_simulations(&mut tree, 25);

        let root = tree.node(tree.root());
        assert_eq!(root.visits, 25);
        assert!(root.reward >= 0.0 && root.reward <= root.visits as f64);

        let child_visits: u32 = tree
            .children(tree.root())
            .iter()
            .map(|&child| tree.node(child).visits)
            .sum();
        assert_eq!(child_visits, 25);
    }

    #[test]
    fn test_finds_mate_in_one() {
        let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let result = search(&game, &options(40, 0));
        assert_eq!(result.best_move.as_deref(), Some("Ra8"));
        assert_eq!(result.ranked[0].win_rate, 1.0);
    }

    #[test]
    fn test_no_moves_gives_no_best_move() {
        let mated = Game::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        let result = search(&mated, &options(5, 3));
        assert_eq!(result.best_move, None);
        assert!(result.ranked.is_empty());
        assert_eq!(result.n_nodes, 1);
    }
}
