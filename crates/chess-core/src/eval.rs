//! Static position evaluation.
//!
//! The score combines material, a small bonus for advanced pawns and the
//! difference in legal move counts. It is used by the search to sample
//! rollout moves and to score positions where a rollout is cut off.

use crate::board::Board;
use crate::colour::Colour;
use crate::piece::PieceKind;

/// Weight of one legal move of mobility difference.
pub const MOBILITY_FACTOR: f64 = 0.02;

/// Bonus of a pawn standing on its promotion rank's doorstep.
pub const PAWN_ADVANCEMENT_FACTOR: f64 = 0.1;

/// Material value of a piece kind in pawns.
#[inline]
pub fn piece_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 3.0,
        PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 100.0,
    }
}

/// Evaluates `board` from the point of view of `colour`.
///
/// # Arguments
///
/// * `board` - The position to score.
/// * `colour` - The side the score is relative to.
///
/// # Returns
///
/// A signed score in pawns; positive values favour `colour`.
pub fn evaluate(board: &Board, colour: Colour) -> f64 {
    let material: f64 = Colour::ALL
        .into_iter()
        .map(|side| {
            let sign = if side == colour { 1.0 } else { -1.0 };
            let total: f64 = board
                .pieces(side)
                .map(|(sq, piece)| {
                    let advancement = if piece.kind == PieceKind::Pawn {
                        PAWN_ADVANCEMENT_FACTOR * pawn_progress(side, sq.rank())
                    } else {
                        0.0
                    };
                    piece_value(piece.kind) + advancement
                })
                .sum();
            sign * total
        })
        .sum();

    let own_moves = board.generate_legal_moves(colour).count() as f64;
    let their_moves = board.generate_legal_moves(colour.opposite()).count() as f64;

    material + MOBILITY_FACTOR * (own_moves - their_moves)
}

/// How far a pawn has come from its starting rank: 0 on the start rank,
/// 1 one step before promotion.
#[inline]
fn pawn_progress(colour: Colour, rank: u8) -> f64 {
    let steps = match colour {
        Colour::White => rank as f64 - 1.0,
        Colour::Black => 6.0 - rank as f64,
    };
    (steps / 6.0).clamp(0.0, 1.0)
}
