//! Turn, clock and result tracking on top of [`Board`].

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::colour::Colour;
use crate::error::FenError;
use crate::move_list::{Move, MoveList};
use crate::square::Square;

/// Number of half-moves without a capture or pawn move after which the
/// game is drawn.
pub const HALFMOVE_LIMIT: u32 = 100;

/// Outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Ongoing,
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }

    /// The winning colour, if the game ended decisively.
    pub fn winner(self) -> Option<Colour> {
        match self {
            GameResult::WhiteWin => Some(Colour::White),
            GameResult::BlackWin => Some(Colour::Black),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }

    fn win_for(colour: Colour) -> GameResult {
        match colour {
            Colour::White => GameResult::WhiteWin,
            Colour::Black => GameResult::BlackWin,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameResult::Ongoing => "*",
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
        };
        f.write_str(text)
    }
}

/// A chess game: a position plus whose turn it is, the move clocks, the
/// SAN history and the result.
///
/// Games are advanced either by SAN text through [`Game::make_valid_move`]
/// or by a generated [`Move`] through [`Game::make_move`].
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    side_to_move: Colour,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<String>,
    result: GameResult,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game in the standard initial position with White to move.
    pub fn new() -> Game {
        Game {
            board: Board::starting_position(),
            side_to_move: Colour::White,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
            result: GameResult::Ongoing,
        }
    }

    /// Parses a full six-field FEN string.
    ///
    /// The result is evaluated immediately, so a position that is already
    /// checkmate or stalemate is reported as over.
    ///
    /// # Errors
    ///
    /// A [`FenError`] describing the first malformed field.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, colour, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(FenError::FieldCount(fields.len()));
        };

        let mut board = Board::from_placement(placement)?;
        let side_to_move = match colour {
            "w" => Colour::White,
            "b" => Colour::Black,
            other => return Err(FenError::InvalidColour(other.to_string())),
        };
        board.set_castling(castling.parse::<CastlingRights>()?);
        board.set_en_passant(parse_en_passant(en_passant)?);

        let mut game = Game {
            board,
            side_to_move,
            halfmove_clock: parse_number(halfmove, "half-move clock")?,
            fullmove_number: parse_number(fullmove, "full-move number")?,
            history: Vec::new(),
            result: GameResult::Ongoing,
        };
        game.update_result();
        Ok(game)
    }

    /// Replaces this game with the one described by `fen`.
    ///
    /// On error the game is left untouched.
    pub fn import_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Game::from_fen(fen)?;
        Ok(())
    }

    /// Renders the game as a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let en_passant = self
            .board
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.to_placement(),
            self.side_to_move.to_fen_char(),
            self.board.castling(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Restores the initial position.
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// SAN of every move played since the game was created or imported.
    #[inline]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[inline]
    pub fn result(&self) -> GameResult {
        self.result
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.result.is_over()
    }

    #[inline]
    pub fn winner(&self) -> Option<Colour> {
        self.result.winner()
    }

    /// Legal moves of the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() {
            return MoveList::default();
        }
        self.board.generate_legal_moves(self.side_to_move)
    }

    /// Plays the legal move whose SAN is exactly `san`.
    ///
    /// # Returns
    ///
    /// `true` if the move was played, `false` if no legal move matches or
    /// the game is already over.
    pub fn make_valid_move(&mut self, san: &str) -> bool {
        match self.legal_moves().take(san) {
            Some(mv) => {
                self.make_move(mv);
                true
            }
            None => {
                debug!(san, fen = %self.to_fen(), "rejected move");
                false
            }
        }
    }

    /// Plays a move already known to be legal for the side to move.
    ///
    /// Updates the clocks and history, passes the turn and re-evaluates the
    /// result for the new side to move.
    pub fn make_move(&mut self, mv: Move) {
        if mv.resets_halfmove_clock() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Colour::Black {
            self.fullmove_number += 1;
        }

        self.board = mv.board;
        self.history.push(mv.san);
        self.side_to_move = self.side_to_move.opposite();
        self.update_result();
    }

    /// Evaluates checkmate, stalemate and the half-move limit for the side
    /// to move.
    fn update_result(&mut self) {
        let side = self.side_to_move;
        self.result = if self.board.generate_legal_moves(side).is_empty() {
            if self.board.is_in_check(side) {
                GameResult::win_for(side.opposite())
            } else {
                GameResult::Draw
            }
        } else if self.halfmove_clock >= HALFMOVE_LIMIT {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        };
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl FromStr for Game {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::from_fen(s)
    }
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant(field.to_string());
    let sq: Square = field.parse().map_err(|_| invalid())?;
    // Only the square behind a pawn that just advanced two ranks qualifies.
    if sq.rank() != 2 && sq.rank() != 5 {
        return Err(invalid());
    }
    Ok(Some(sq))
}

fn parse_number(field: &str, name: &'static str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidNumber {
        field: name,
        value: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::START_FEN;

    #[test]
    fn test_new_game_matches_start_fen() {
        let game = Game::new();
        assert_eq!(game.to_fen(), START_FEN);
        assert_eq!(game.side_to_move(), Colour::White);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(Game::from_fen(START_FEN).unwrap().to_fen(), START_FEN);
    }

    #[test]
    fn test_fen_roundtrip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 40",
        ] {
            let game: Game = fen.parse().unwrap();
            assert_eq!(game.to_string(), fen);
        }
    }

    #[test]
    fn test_fen_errors() {
        assert_eq!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - -"),
            Err(FenError::FieldCount(4))
        );
        assert_eq!(
            Game::from_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidColour("x".to_string()))
        );
        assert_eq!(
            Game::from_fen("8/8/8/8/8/8/8/8 w KQz - 0 1"),
            Err(FenError::InvalidCastling('z'))
        );
        assert_eq!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassant("e4".to_string()))
        );
        assert_eq!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - - -1 1"),
            Err(FenError::InvalidNumber {
                field: "half-move clock",
                value: "-1".to_string()
            })
        );
        assert!(matches!(
            Game::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPlacement(_))
        ));
    }

    #[test]
    fn test_failed_import_keeps_game() {
        let mut game = Game::new();
        assert!(game.make_valid_move("e4"));
        let before = game.to_fen();
        assert!(game.import_fen("not a fen").is_err());
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.history(), ["e4"]);
    }

    #[test]
    fn test_clocks_and_history() {
        let mut game = Game::new();
        assert!(game.make_valid_move("Nf3"));
        assert_eq!(game.halfmove_clock(), 1);
        assert_eq!(game.fullmove_number(), 1);

        assert!(game.make_valid_move("d5"));
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.fullmove_number(), 2);
        assert_eq!(game.board().en_passant(), Some(Square::D6));

        assert!(game.make_valid_move("Nc3"));
        assert!(game.make_valid_move("Nf6"));
        assert_eq!(game.halfmove_clock(), 2);

        assert!(game.make_valid_move("Nxd5"));
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.history(), ["Nf3", "d5", "Nc3", "Nf6", "Nxd5"]);
        assert_eq!(game.side_to_move(), Colour::Black);
    }

    #[test]
    fn test_rejects_illegal_and_misspelled_moves() {
        let mut game = Game::new();
        assert!(!game.make_valid_move("e5"));
        assert!(!game.make_valid_move("E4"));
        assert!(!game.make_valid_move("e4+"));
        assert!(!game.make_valid_move(""));
        assert_eq!(game.to_fen(), START_FEN);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            assert!(game.make_valid_move(san), "{san} rejected");
        }
        assert_eq!(game.result(), GameResult::BlackWin);
        assert_eq!(game.winner(), Some(Colour::Black));
        assert!(game.legal_moves().is_empty());
        assert!(!game.make_valid_move("e4"));
    }

    #[test]
    fn test_stalemate_is_draw() {
        let mut game = Game::from_fen("7k/8/5Q2/6K1/8/8/8/8 w - - 0 1").unwrap();
        assert!(game.make_valid_move("Qf7"));
        assert_eq!(game.result(), GameResult::Draw);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_halfmove_limit_is_draw() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 99 80").unwrap();
        assert!(game.make_valid_move("Rh2"));
        assert_eq!(game.halfmove_clock(), HALFMOVE_LIMIT);
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_imported_mate_is_over() {
        let game = Game::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert_eq!(game.result(), GameResult::WhiteWin);
    }

    #[test]
    fn test_reset() {
        let mut game = Game::new();
        assert!(game.make_valid_move("e4"));
        game.reset();
        assert_eq!(game.to_fen(), START_FEN);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_result_display() {
        assert_eq!(GameResult::Ongoing.to_string(), "*");
        assert_eq!(GameResult::WhiteWin.to_string(), "1-0");
        assert_eq!(GameResult::Draw.to_string(), "1/2-1/2");
    }
}
