//! Index-addressed MCTS tree.
//!
//! Nodes live in a single vector and refer to their parent and children by
//! [`NodeId`]. Node 0 is always the root.

use tracing::debug;

use crate::colour::Colour;
use crate::game::Game;

/// Index of a node in a [`SearchTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A game state reached during search, with its statistics.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub game: Game,
    /// SAN of the move that led here; `None` at the root.
    pub san: Option<String>,
    pub to_move: Colour,
    pub visits: u32,
    /// Sum of the rewards of every simulation through this node.
    pub reward: f64,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl SearchNode {
    fn new(game: Game, san: Option<String>, parent: Option<NodeId>) -> SearchNode {
        SearchNode {
            to_move: game.side_to_move(),
            game,
            san,
            visits: 0,
            reward: 0.0,
            children: Vec::new(),
            parent,
        }
    }

    /// Average reward, or 0 for an unvisited node.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }
}

/// UCT score of a child.
///
/// # Arguments
///
/// * `child_visits` - Visits of the child; 0 yields positive infinity.
/// * `child_reward` - Accumulated reward of the child.
/// * `parent_visits` - Visits of the child's parent.
/// * `exploration` - Weight of the exploration term.
#[inline]
pub fn uct_value(child_visits: u32, child_reward: f64, parent_visits: u32, exploration: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }
    let visits = child_visits as f64;
    let win_rate = child_reward / visits;
    win_rate + exploration * ((parent_visits as f64 + 1.0).ln() / visits).sqrt()
}

/// Arena of search nodes rooted at the position being searched.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Creates a tree holding only the root.
    pub fn new(game: Game) -> SearchTree {
        SearchTree {
            nodes: vec![SearchNode::new(game, None, None)],
        }
    }

    /// Creates a tree with every legal line expanded `depth` plies deep.
    ///
    /// The root is always expanded, so a `depth` of 0 builds one ply.
    /// Positions where the game is over are not expanded.
    pub fn with_depth(game: Game, depth: u32) -> SearchTree {
        let depth = depth.max(1);
        let mut tree = SearchTree::new(game);
        let mut frontier = vec![NodeId::ROOT];
        for _ in 0..depth {
            let mut next = Vec::new();
            for id in frontier {
                next.extend(tree.expand(id));
            }
            frontier = next;
        }
        debug!(depth, nodes = tree.len(), "search tree built");
        tree
    }

    /// Adds one child per legal move of `id`'s position and returns their
    /// ids. Does nothing if the node already has children or the game is over.
    pub fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        let node = &self.nodes[id.0];
        if !node.children.is_empty() || node.game.is_over() {
            return Vec::new();
        }

        let game = node.game.clone();
        let mut children = Vec::new();
        for mv in game.legal_moves() {
            let mut next = game.clone();
            let san = mv.san.clone();
            next.make_move(mv);

            let child = NodeId(self.nodes.len());
            self.nodes.push(SearchNode::new(next, Some(san), Some(id)));
            children.push(child);
        }
        self.nodes[id.0].children.clone_from(&children);
        children
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The colour rewards are measured for: the side to move at the root.
    #[inline]
    pub fn perspective(&self) -> Colour {
        self.nodes[0].to_move
    }

    /// Descends from the root to a node without children, always taking
    /// the child with the highest UCT value. Ties go to the earlier child.
    pub fn select(&self, exploration: f64) -> NodeId {
        let mut current = NodeId::ROOT;
        loop {
            let node = &self.nodes[current.0];
            let Some((&first, rest)) = node.children.split_first() else {
                return current;
            };
            let uct = |id: NodeId| {
                let child = &self.nodes[id.0];
                uct_value(child.visits, child.reward, node.visits, exploration)
            };

            let mut best = first;
            let mut best_value = uct(first);
            for &child in rest {
                let value = uct(child);
                if value > best_value {
                    best = child;
                    best_value = value;
                }
            }
            current = best;
        }
    }

    /// Adds one visit and `reward` to `id` and each of its ancestors.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.0];
            node.visits += 1;
            node.reward += reward;
            current = node.parent;
        }
    }

    /// Root children sorted by win rate, best first; equal win rates keep
    /// generation order.
    pub fn ranked_children(&self) -> Vec<NodeId> {
        let mut ranked = self.children(NodeId::ROOT).to_vec();
        ranked.sort_by(|a, b| {
            self.nodes[b.0]
                .win_rate()
                .total_cmp(&self.nodes[a.0].win_rate())
        });
        ranked
    }
}
