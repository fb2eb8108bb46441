//! Game state management for the chess CLI.
//!
//! Wraps the core [`Game`] with an undo stack and colored board printing.

use chess_core::{Colour, Game, Square};
use chess_core::error::FenError;
use colored::Colorize;

/// A game plus the positions it passed through, for undo.
pub struct GameState {
    core: Game,
    previous: Vec<Game>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            core: Game::new(),
            previous: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.core
    }

    /// Replaces the position with one loaded from FEN. Undo history is
    /// cleared only if the FEN is valid.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.core.import_fen(fen)?;
        self.previous.clear();
        Ok(())
    }

    /// Plays a SAN move.
    ///
    /// # Returns
    /// `false` if the move is not legal here, leaving the state untouched
    pub fn play(&mut self, san: &str) -> bool {
        let before = self.core.clone();
        if self.core.make_valid_move(san) {
            self.previous.push(before);
            true
        } else {
            false
        }
    }

    /// Takes back the last move.
    ///
    /// # Returns
    /// `true` if a move was undone, `false` if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.previous.pop() {
            Some(game) => {
                self.core = game;
                true
            }
            None => false,
        }
    }

    /// Prints a colored representation of the board, White at the bottom.
    pub fn print(&self) {
        let board = self.core.board();
        let last = self.last_move_squares();

        println!("      a   b   c   d   e   f   g   h");
        println!("    ┌───┬───┬───┬───┬───┬───┬───┬───┐");

        for rank in (0..8u8).rev() {
            print!("  {} │", rank + 1);
            for file in 0..8u8 {
                let Some(sq) = Square::from_file_rank(file, rank) else {
                    continue;
                };
                let cell = match board.piece_at(sq) {
                    Some(piece) => {
                        let text = format!(" {} ", piece.to_fen_char());
                        match piece.colour {
                            Colour::White => text.bright_yellow(),
                            Colour::Black => text.bright_green(),
                        }
                    }
                    None => "   ".normal(),
                };
                if last.contains(&sq) {
                    print!("{}│", cell.on_bright_black());
                } else {
                    print!("{cell}│");
                }
            }

            match rank {
                5 => println!("   {} to move", self.core.side_to_move()),
                4 => println!("   move {}", self.core.fullmove_number()),
                3 => println!("   half-move clock {}", self.core.halfmove_clock()),
                1 if self.core.is_over() => {
                    println!("   {}", format!("*** {} ***", self.core.result()).bright_red())
                }
                _ => println!(),
            }

            if rank > 0 {
                println!("    ├───┼───┼───┼───┼───┼───┼───┼───┤");
            }
        }
        println!("    └───┴───┴───┴───┴───┴───┴───┴───┘");
    }

    /// Origin and destination of the last move, found by comparing boards.
    fn last_move_squares(&self) -> Vec<Square> {
        let Some(before) = self.previous.last() else {
            return Vec::new();
        };
        let after = self.core.board();
        Square::iter()
            .filter(|&sq| before.board().piece_at(sq) != after.piece_at(sq))
            .collect()
    }
}
