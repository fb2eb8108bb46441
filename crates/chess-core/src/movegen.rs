//! Per-piece movement policies.
//!
//! Every policy is a pure function of an origin square and a read-only
//! board, returning the candidate target squares without regard to whether
//! the move would leave the mover in check.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::castling::{CastlingSide, king_home};
use crate::colour::Colour;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// Candidate targets of a single piece. A queen in the centre of an empty
/// board has 27, the most of any piece.
pub type Targets = ArrayVec<Square, 32>;

const ROOK_DIRECTIONS: [i8; 4] = [8, -8, 1, -1];
const BISHOP_DIRECTIONS: [i8; 4] = [9, 7, -7, -9];
const QUEEN_DIRECTIONS: [i8; 8] = [8, -8, 1, -1, 9, 7, -7, -9];

/// (delta rank, delta file) pairs of a knight jump.
#[rustfmt::skip]
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

/// Computes the pseudo-legal targets of `piece` standing on `from`.
///
/// Kings include castling destinations, which are fully gated here on the
/// castling right, empty intervening squares and unattacked king path.
///
/// # Arguments
///
/// * `piece` - The piece to move; its colour decides which occupants are enemies.
/// * `from` - The square the piece stands on.
/// * `board` - The position, never modified.
pub fn targets(piece: Piece, from: Square, board: &Board) -> Targets {
    match piece.kind {
        PieceKind::King => {
            let mut targets = king_steps(from, piece.colour, board);
            targets.extend(castling_targets(board, from, piece.colour));
            targets
        }
        PieceKind::Pawn => pawn_targets(from, piece.colour, board),
        _ => attacks(piece, from, board),
    }
}

/// Squares `piece` could capture on: [`targets`] without castling or pawn
/// pushes, and with both pawn diagonals whether or not they are occupied.
///
/// Check detection uses this so that testing castling legality does not
/// recurse into itself.
pub fn attacks(piece: Piece, from: Square, board: &Board) -> Targets {
    let colour = piece.colour;
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(from, colour, board),
        PieceKind::Knight => knight_targets(from, colour, board),
        PieceKind::Bishop => slider_targets(from, colour, board, &BISHOP_DIRECTIONS),
        PieceKind::Rook => slider_targets(from, colour, board, &ROOK_DIRECTIONS),
        PieceKind::Queen => slider_targets(from, colour, board, &QUEEN_DIRECTIONS),
        PieceKind::King => king_steps(from, colour, board),
    }
}

/// Castling destinations available to the king of `colour` on `from`.
///
/// A side is offered only if the right is still held, the king stands on its
/// home square with its own rook on the corner, every square between them is
/// empty and the king is not attacked on its origin, the square it passes
/// over or its destination. Attacks are tested by relocating the king on a
/// clone and asking for check.
pub fn castling_targets(board: &Board, from: Square, colour: Colour) -> ArrayVec<Square, 2> {
    let mut targets = ArrayVec::new();
    let king = Piece::new(PieceKind::King, colour);
    if from != king_home(colour) || board.piece_at(from) != Some(king) {
        return targets;
    }

    let mut origin_attacked = None;
    for side in CastlingSide::ALL {
        if !board.castling().has(colour, side) {
            continue;
        }
        let corner = side.rook_corner(colour);
        if board.piece_at(corner) != Some(Piece::new(PieceKind::Rook, colour)) {
            continue;
        }

        let (low, high) = if corner < from {
            (corner.index(), from.index())
        } else {
            (from.index(), corner.index())
        };
        let blocked = (low + 1..high)
            .filter_map(Square::from_index)
            .any(|sq| board.is_occupied(sq));
        if blocked {
            continue;
        }

        if *origin_attacked.get_or_insert_with(|| board.is_in_check(colour)) {
            return targets;
        }

        let transit = side.rook_destination(colour);
        let destination = side.king_destination(colour);
        let path_attacked = [transit, destination]
            .into_iter()
            .any(|sq| attacked_if_relocated(board, from, sq, king));
        if !path_attacked {
            targets.push(destination);
        }
    }
    targets
}

/// Moves the king to `to` on a scratch copy and reports whether it is in check there.
fn attacked_if_relocated(board: &Board, from: Square, to: Square, king: Piece) -> bool {
    let mut probe = board.clone();
    probe.remove_piece(from);
    probe.set_piece(to, king);
    probe.is_in_check(king.colour)
}

/// One step from `from` in index direction `dir`.
///
/// Horizontal and diagonal steps must change the file by exactly one, which
/// rejects wrapping from one edge of the board to the other.
#[inline]
fn step(from: Square, dir: i8) -> Option<Square> {
    let to = Square::from_signed(from.index() as i32 + dir as i32)?;
    if dir % 8 != 0 && from.file().abs_diff(to.file()) != 1 {
        return None;
    }
    Some(to)
}

/// True if `to` is empty or holds an enemy of `colour`.
#[inline]
fn is_available(board: &Board, to: Square, colour: Colour) -> bool {
    board.piece_at(to).is_none_or(|occupant| occupant.colour != colour)
}

fn slider_targets(from: Square, colour: Colour, board: &Board, directions: &[i8]) -> Targets {
    let mut targets = Targets::new();
    for &dir in directions {
        let mut current = from;
        while let Some(next) = step(current, dir) {
            match board.piece_at(next) {
                None => targets.push(next),
                Some(occupant) => {
                    if occupant.colour != colour {
                        targets.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    targets
}

fn knight_targets(from: Square, colour: Colour, board: &Board) -> Targets {
    KNIGHT_DELTAS
        .iter()
        .filter_map(|&(delta_rank, delta_file)| from.shift(delta_file, delta_rank))
        .filter(|&to| is_available(board, to, colour))
        .collect()
}

fn king_steps(from: Square, colour: Colour, board: &Board) -> Targets {
    QUEEN_DIRECTIONS
        .iter()
        .filter_map(|&dir| step(from, dir))
        .filter(|&to| is_available(board, to, colour))
        .collect()
}

fn pawn_targets(from: Square, colour: Colour, board: &Board) -> Targets {
    let mut targets = Targets::new();
    let forward = colour.forward();
    let start_rank = (colour.back_rank() as i8 + forward) as u8;

    if let Some(one) = from.shift(0, forward) {
        if !board.is_occupied(one) {
            targets.push(one);
            if from.rank() == start_rank {
                if let Some(two) = one.shift(0, forward) {
                    if !board.is_occupied(two) {
                        targets.push(two);
                    }
                }
            }
        }
    }

    let enemy_pawn = Piece::new(PieceKind::Pawn, colour.opposite());
    for delta_file in [-1, 1] {
        let Some(diagonal) = from.shift(delta_file, forward) else {
            continue;
        };
        match board.piece_at(diagonal) {
            Some(occupant) if occupant.colour != colour => targets.push(diagonal),
            Some(_) => {}
            None => {
                let captures_en_passant = board.en_passant() == Some(diagonal)
                    && diagonal
                        .shift(0, -forward)
                        .is_some_and(|behind| board.piece_at(behind) == Some(enemy_pawn));
                if captures_en_passant {
                    targets.push(diagonal);
                }
            }
        }
    }
    targets
}

fn pawn_attacks(from: Square, colour: Colour, board: &Board) -> Targets {
    [-1, 1]
        .into_iter()
        .filter_map(|delta_file| from.shift(delta_file, colour.forward()))
        .filter(|&sq| board.piece_at(sq).is_none_or(|occupant| occupant.colour != colour))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::castling::CastlingRights;

    fn sorted(mut targets: Vec<Square>) -> Vec<Square> {
        targets.sort();
        targets
    }

    fn targets_at(board: &Board, from: Square) -> Vec<Square> {
        let piece = board.piece_at(from).unwrap();
        sorted(targets(piece, from, board).to_vec())
    }

    #[test]
    fn test_step_rejects_wrap() {
        assert_eq!(step(Square::H4, 1), None);
        assert_eq!(step(Square::A4, -1), None);
        assert_eq!(step(Square::A4, 7), None);
        assert_eq!(step(Square::H4, 9), None);
        assert_eq!(step(Square::H4, -7), None);
        assert_eq!(step(Square::E8, 8), None);
        assert_eq!(step(Square::E4, 9), Some(Square::F5));
        assert_eq!(step(Square::E4, -8), Some(Square::E3));
    }

    #[test]
    fn test_knight_in_corner() {
        let board = Board::from_placement("8/8/8/8/8/8/8/N7").unwrap();
        assert_eq!(targets_at(&board, Square::A1), vec![Square::C2, Square::B3]);
    }

    #[test]
    fn test_queen_on_empty_board() {
        let board = Board::from_placement("8/8/8/8/3Q4/8/8/8").unwrap();
        assert_eq!(targets_at(&board, Square::D4).len(), 27);
    }

    #[test]
    fn test_rook_ray_stops_at_pieces() {
        // Rook a1, own pawn a3, enemy knight d1.
        let board = Board::from_placement("8/8/8/8/8/P7/8/R2n4").unwrap();
        assert_eq!(
            targets_at(&board, Square::A1),
            vec![Square::B1, Square::C1, Square::D1, Square::A2]
        );
    }

    #[test]
    fn test_pawn_pushes_and_captures() {
        let board = Board::from_placement("8/8/8/8/8/3p4/4P3/8").unwrap();
        assert_eq!(
            targets_at(&board, Square::E2),
            vec![Square::D3, Square::E3, Square::E4]
        );

        let blocked = Board::from_placement("8/8/8/8/4p3/8/4P3/8").unwrap();
        assert_eq!(targets_at(&blocked, Square::E2), vec![Square::E3]);

        let black = Board::from_placement("8/3p4/8/8/8/8/8/8").unwrap();
        assert_eq!(targets_at(&black, Square::D7), vec![Square::D5, Square::D6]);
    }

    #[test]
    fn test_pawn_attacks_are_diagonals_only() {
        let board = Board::from_placement("8/8/8/8/8/5P2/4P3/8").unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Colour::White);
        assert_eq!(attacks(pawn, Square::E2, &board).as_slice(), &[Square::D3]);

        let edge = Board::from_placement("8/p7/8/8/8/8/8/8").unwrap();
        let black_pawn = Piece::new(PieceKind::Pawn, Colour::Black);
        assert_eq!(attacks(black_pawn, Square::A7, &edge).as_slice(), &[Square::B6]);
    }

    #[test]
    fn test_en_passant_needs_pawn_behind_target() {
        let mut board = Board::from_placement("8/8/8/3pP3/8/8/8/8").unwrap();
        board.set_en_passant(Some(Square::D6));
        assert_eq!(targets_at(&board, Square::E5), vec![Square::D6, Square::E6]);

        let mut no_pawn = Board::from_placement("8/8/8/3nP3/8/8/8/8").unwrap();
        no_pawn.set_en_passant(Some(Square::D6));
        assert_eq!(targets_at(&no_pawn, Square::E5), vec![Square::E6]);
    }

    #[test]
    fn test_castling_both_sides() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(
            sorted(castling_targets(&board, Square::E1, Colour::White).to_vec()),
            vec![Square::C1, Square::G1]
        );
    }

    #[test]
    fn test_castling_gated_by_rights() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        let mut rights = CastlingRights::ALL;
        rights.revoke(Colour::White, CastlingSide::QueenSide);
        board.set_castling(rights);
        assert_eq!(
            castling_targets(&board, Square::E1, Colour::White).to_vec(),
            vec![Square::G1]
        );
    }

    #[test]
    fn test_castling_gated_by_blockers() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/RN2K1NR").unwrap();
        assert!(castling_targets(&board, Square::E1, Colour::White).is_empty());
    }

    #[test]
    fn test_castling_gated_by_attacks() {
        // Rook on f8 covers f1: no king-side castling.
        let board = Board::from_placement("4kr2/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(
            castling_targets(&board, Square::E1, Colour::White).to_vec(),
            vec![Square::C1]
        );

        // In check: neither side.
        let checked = Board::from_placement("4k3/8/8/8/8/5n2/8/R3K2R").unwrap();
        assert!(castling_targets(&checked, Square::E1, Colour::White).is_empty());

        // Only b1 attacked: queen-side castling is still allowed.
        let b_file = Board::from_placement("1r2k3/8/8/8/8/8/8/R3K3").unwrap();
        assert_eq!(
            castling_targets(&b_file, Square::E1, Colour::White).to_vec(),
            vec![Square::C1]
        );
    }
}
