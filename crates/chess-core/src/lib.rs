//! Chess rules engine with a Monte Carlo Tree Search move recommender.
//!
//! The crate is layered leaves first: [`store::PositionStore`] holds the
//! pieces of a [`board::Board`], the [`movegen`] policies produce candidate
//! targets, [`game::Game`] tracks turns and results, [`eval`] scores
//! positions statically and [`search`] ranks candidate moves.

pub mod analysis;
pub mod board;
pub mod castling;
pub mod colour;
pub mod error;
pub mod eval;
pub mod game;
pub mod level;
pub mod move_list;
pub mod movegen;
pub mod perft;
pub mod piece;
pub mod search;
pub mod square;
pub mod store;

pub use board::Board;
pub use colour::Colour;
pub use game::{Game, GameResult};
pub use move_list::{Move, MoveList};
pub use piece::{Piece, PieceKind};
pub use square::Square;

/// FEN of the standard initial position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
