use crate::board::Board;
use crate::colour::Colour;

/// Counts the leaf nodes of the legal move tree below `board`.
///
/// # Arguments
///
/// * `board` - The position to start from.
/// * `colour` - The side to move in `board`.
/// * `depth` - Number of plies to expand. A depth of `1` counts the
///   immediate legal moves; a depth of `0` counts the position itself.
///
/// # Returns
///
/// The number of positions reached after exactly `depth` plies.
pub fn perft(board: &Board, colour: Colour, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.generate_legal_moves(colour);
    if depth == 1 {
        return moves.count() as u64;
    }
    moves
        .iter()
        .map(|mv| perft(&mv.board, colour.opposite(), depth - 1))
        .sum()
}

/// Like [`perft`] but reports the count below each root move separately,
/// in generation order.
pub fn perft_divide(board: &Board, colour: Colour, depth: u32) -> Vec<(String, u64)> {
    board
        .generate_legal_moves(colour)
        .into_iter()
        .map(|mv| {
            let nodes = perft(&mv.board, colour.opposite(), depth.saturating_sub(1));
            (mv.san, nodes)
        })
        .collect()
}
