//! Descriptive position metrics that are not used by the search.

use crate::board::Board;
use crate::colour::Colour;
use crate::move_list::MoveList;
use crate::movegen;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

const BRANCHING_WEIGHT: f64 = 0.2;
const FORCING_WEIGHT: f64 = 0.4;
const TACTICAL_WEIGHT: f64 = 0.2;
const KING_SAFETY_WEIGHT: f64 = 0.2;

/// (delta file, delta rank) of the rook rays followed by the bishop rays.
#[rustfmt::skip]
const QUEEN_RAYS: [(i8, i8); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Mass of a piece for [`centre_of_mass`]. The king is lighter than its
/// material value so that it does not dominate.
fn mass(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight | PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 4.0,
    }
}

/// Average (file, rank) of the pieces of `colour`, both in 0.0..=7.0.
///
/// # Arguments
///
/// * `board` - The position.
/// * `colour` - Whose pieces to average.
/// * `weighted` - Weigh pieces by mass instead of counting each once.
///
/// # Returns
///
/// `None` if `colour` has no pieces.
pub fn centre_of_mass(board: &Board, colour: Colour, weighted: bool) -> Option<(f64, f64)> {
    let (sum_file, sum_rank, total) = board.pieces(colour).fold(
        (0.0, 0.0, 0.0),
        |(sum_file, sum_rank, total), (sq, piece)| {
            let weight = if weighted { mass(piece.kind) } else { 1.0 };
            (
                sum_file + sq.file() as f64 * weight,
                sum_rank + sq.rank() as f64 * weight,
                total + weight,
            )
        },
    );
    (total > 0.0).then(|| (sum_file / total, sum_rank / total))
}

/// Estimates how hard the position is to play for `colour`, from 0 to 100.
///
/// Mixes the branching factor, the share of forcing moves (captures and
/// checks), tactical motifs (forks and pins or skewers) and direct threats
/// to the king.
pub fn cognitive_load(board: &Board, colour: Colour) -> f64 {
    let moves = board.generate_legal_moves(colour);
    let raw = BRANCHING_WEIGHT * branching_score(&moves)
        + FORCING_WEIGHT * forcing_score(&moves, colour)
        + TACTICAL_WEIGHT * tactical_score(board, colour)
        + KING_SAFETY_WEIGHT * king_threat_score(board, colour);
    (raw * 100.0).min(100.0)
}

fn branching_score(moves: &MoveList) -> f64 {
    (moves.count() as f64 / 40.0).tanh()
}

fn forcing_score(moves: &MoveList, colour: Colour) -> f64 {
    if moves.is_empty() {
        return 0.0;
    }
    let opponent = colour.opposite();
    let forcing = moves
        .iter()
        .filter(|mv| mv.is_capture || mv.board.is_in_check(opponent))
        .count();
    forcing as f64 / moves.count() as f64
}

fn tactical_score(board: &Board, colour: Colour) -> f64 {
    let motifs: usize = board
        .pieces(colour)
        .map(|(sq, piece)| {
            usize::from(is_fork(board, sq, piece)) + pins_and_skewers(board, sq, piece)
        })
        .sum();
    (motifs as f64 / 5.0).tanh()
}

fn king_threat_score(board: &Board, colour: Colour) -> f64 {
    let Some(king) = board.king_square(colour) else {
        return 1.0;
    };
    let threats = board
        .pieces(colour.opposite())
        .filter(|&(sq, piece)| movegen::attacks(piece, sq, board).contains(&king))
        .count();
    (threats as f64 / 3.0).tanh()
}

/// True if the piece on `sq` attacks two or more enemy pieces.
fn is_fork(board: &Board, sq: Square, piece: Piece) -> bool {
    movegen::attacks(piece, sq, board)
        .iter()
        .filter(|&&target| board.piece_at(target).is_some_and(|p| p.colour != piece.colour))
        .count()
        >= 2
}

/// Number of rays from a slider on which the first two pieces met are
/// both enemies.
fn pins_and_skewers(board: &Board, sq: Square, piece: Piece) -> usize {
    let rays: &[(i8, i8)] = match piece.kind {
        PieceKind::Rook => &QUEEN_RAYS[..4],
        PieceKind::Bishop => &QUEEN_RAYS[4..],
        PieceKind::Queen => &QUEEN_RAYS,
        _ => return 0,
    };

    rays.iter()
        .filter(|&&(delta_file, delta_rank)| {
            let mut met = std::iter::successors(sq.shift(delta_file, delta_rank), |current| {
                current.shift(delta_file, delta_rank)
            })
            .filter_map(|current| board.piece_at(current));
            matches!(
                (met.next(), met.next()),
                (Some(first), Some(second))
                    if first.colour != piece.colour && second.colour != piece.colour
            )
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_of_mass_uniform() {
        let board = Board::from_placement("8/8/8/8/8/8/8/R6R").unwrap();
        assert_eq!(centre_of_mass(&board, Colour::White, false), Some((3.5, 0.0)));
        assert_eq!(centre_of_mass(&board, Colour::Black, false), None);
    }

    #[test]
    fn test_centre_of_mass_weighted() {
        // Queen on a1 (mass 9) and pawn on h1 (mass 1).
        let board = Board::from_placement("8/8/8/8/8/8/8/Q6P").unwrap();
        let (file, rank) = centre_of_mass(&board, Colour::White, true).unwrap();
        assert!((file - 0.7).abs() < 1e-9);
        assert_eq!(rank, 0.0);
    }

    #[test]
    fn test_initial_position_is_symmetric() {
        let board = Board::starting_position();
        let (white_file, white_rank) = centre_of_mass(&board, Colour::White, false).unwrap();
        let (black_file, black_rank) = centre_of_mass(&board, Colour::Black, false).unwrap();
        assert_eq!(white_file, black_file);
        assert_eq!(white_rank + black_rank, 7.0);
    }

    #[test]
    fn test_fork_and_skewer_detection() {
        // Knight on d5 forks the rooks on c7 and e7.
        let fork = Board::from_placement("4k3/2r1r3/8/3N4/8/8/8/4K3").unwrap();
        assert!(is_fork(&fork, Square::D5, Piece::new(PieceKind::Knight, Colour::White)));

        // Rook on a1 skewers the king on a5 and the queen on a8.
        let skewer = Board::from_placement("q7/8/8/k7/8/8/8/R3K3").unwrap();
        assert_eq!(
            pins_and_skewers(&skewer, Square::A1, Piece::new(PieceKind::Rook, Colour::White)),
            1
        );
    }

    #[test]
    fn test_cognitive_load_range() {
        for placement in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            "8/8/8/8/8/8/8/8",
        ] {
            let board = Board::from_placement(placement).unwrap();
            for colour in Colour::ALL {
                let load = cognitive_load(&board, colour);
                assert!((0.0..=100.0).contains(&load), "{placement}: {load}");
            }
        }
    }

    #[test]
    fn test_tactics_raise_load() {
        let quiet = Board::starting_position();
        let sharp =
            Board::from_placement("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R")
                .unwrap();
        assert!(cognitive_load(&sharp, Colour::White) > cognitive_load(&quiet, Colour::White));
    }
}
