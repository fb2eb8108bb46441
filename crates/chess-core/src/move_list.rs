//! Move records and SAN generation.
//!
//! A [`Move`] is a SAN label together with the complete position it leads
//! to, so applying a move never needs undo information.

use std::collections::BTreeMap;
use std::slice;

use crate::board::Board;
use crate::castling::CastlingSide;
use crate::colour::Colour;
use crate::movegen;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// A generated move and the board it produces.
#[derive(Clone, Debug)]
pub struct Move {
    /// Standard Algebraic Notation without check suffixes.
    pub san: String,
    pub from: Square,
    pub to: Square,
    /// Piece a pawn promotes to, if any.
    pub promotion: Option<PieceKind>,
    /// True for any capture, en passant included.
    pub is_capture: bool,
    pub is_pawn_move: bool,
    /// The position after the move.
    pub board: Board,
}

impl Move {
    /// Returns true if the move resets the half-move clock.
    #[inline]
    pub fn resets_halfmove_clock(&self) -> bool {
        self.is_capture || self.is_pawn_move
    }
}

/// Moves of one side in generation order: pieces by ascending square, each
/// piece's targets in policy order and promotions as Q, R, B, N.
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Generates every pseudo-legal move of `colour`.
    ///
    /// Targets holding the enemy king are never offered.
    ///
    /// # Arguments
    ///
    /// * `board` - The position to move from.
    /// * `colour` - The side to move.
    pub fn pseudo_legal(board: &Board, colour: Colour) -> MoveList {
        let mut moves = Vec::with_capacity(48);
        for (from, piece) in board.pieces(colour) {
            for to in movegen::targets(piece, from, board) {
                if board
                    .piece_at(to)
                    .is_some_and(|occupant| occupant.kind == PieceKind::King)
                {
                    continue;
                }
                push_moves(board, piece, from, to, &mut moves);
            }
        }
        MoveList { moves }
    }

    /// Generates every legal move of `colour`: the pseudo-legal moves that
    /// do not leave its own king in check.
    pub fn legal(board: &Board, colour: Colour) -> MoveList {
        let mut list = MoveList::pseudo_legal(board, colour);
        list.moves.retain(|mv| !mv.board.is_in_check(colour));
        list
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&Move> {
        self.moves.first()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Finds the move with exactly this SAN (case-sensitive).
    pub fn find(&self, san: &str) -> Option<&Move> {
        self.moves.iter().find(|mv| mv.san == san)
    }

    /// Consumes the list and returns the move with exactly this SAN.
    pub fn take(self, san: &str) -> Option<Move> {
        self.moves.into_iter().find(|mv| mv.san == san)
    }

    pub fn sans(&self) -> Vec<String> {
        self.moves.iter().map(|mv| mv.san.clone()).collect()
    }

    /// Groups the moves by origin square, in ascending square order.
    pub fn by_origin(&self) -> BTreeMap<Square, Vec<&Move>> {
        let mut groups: BTreeMap<Square, Vec<&Move>> = BTreeMap::new();
        for mv in &self.moves {
            groups.entry(mv.from).or_default().push(mv);
        }
        groups
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Materializes the move `from` -> `to`, fanning promotions out into one
/// move per promotion piece.
fn push_moves(board: &Board, piece: Piece, from: Square, to: Square, moves: &mut Vec<Move>) {
    let is_pawn_move = piece.kind == PieceKind::Pawn;
    let is_capture = board.is_occupied(to) || (is_pawn_move && from.file() != to.file());
    let san = san_for(board, piece, from, to, is_capture);

    let mut next = board.clone();
    next.apply_move(from, to);

    if is_pawn_move && to.rank() == piece.colour.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            let mut promoted = next.clone();
            promoted.set_piece(to, Piece::new(kind, piece.colour));
            moves.push(Move {
                san: format!("{san}={}", kind.san_letter()),
                from,
                to,
                promotion: Some(kind),
                is_capture,
                is_pawn_move,
                board: promoted,
            });
        }
    } else {
        moves.push(Move {
            san,
            from,
            to,
            promotion: None,
            is_capture,
            is_pawn_move,
            board: next,
        });
    }
}

/// Builds the SAN of a move, without promotion suffix.
fn san_for(board: &Board, piece: Piece, from: Square, to: Square, is_capture: bool) -> String {
    if piece.kind == PieceKind::King && from.file().abs_diff(to.file()) == 2 {
        let side = if to.file() > from.file() {
            CastlingSide::KingSide
        } else {
            CastlingSide::QueenSide
        };
        return side.san().to_string();
    }

    let mut san = String::with_capacity(8);
    if piece.kind == PieceKind::Pawn {
        if is_capture {
            san.push(from.file_char());
        }
    } else {
        san.push_str(piece.kind.san_letter());
        disambiguate(board, piece, from, to, &mut san);
    }
    if is_capture {
        san.push('x');
    }
    san.push_str(&to.to_string());
    san
}

/// Appends the origin file, rank or square when another piece of the same
/// kind and colour can also legally reach `to`.
fn disambiguate(board: &Board, piece: Piece, from: Square, to: Square, san: &mut String) {
    let rivals: Vec<Square> = board
        .pieces(piece.colour)
        .filter(|&(sq, other)| sq != from && other == piece)
        .filter(|&(sq, other)| movegen::targets(other, sq, board).contains(&to))
        .filter(|&(sq, _)| {
            let mut probe = board.clone();
            probe.apply_move(sq, to);
            !probe.is_in_check(piece.colour)
        })
        .map(|(sq, _)| sq)
        .collect();

    if rivals.is_empty() {
        return;
    }
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        san.push(from.file_char());
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        san.push(from.rank_char());
    } else {
        san.push_str(&from.to_string());
    }
}
