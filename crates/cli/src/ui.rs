//! Interactive line-based play against the search.

use chess_core::Colour;
use chess_core::search::{self, SearchOptions};
use colored::Colorize;
use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::debug;

use crate::game::GameState;

/// Who the computer plays for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    ComputerBlack,
    ComputerWhite,
    ComputerBoth,
    HumanBoth,
}

impl Mode {
    fn from_index(index: usize) -> Option<Mode> {
        match index {
            0 => Some(Mode::ComputerBlack),
            1 => Some(Mode::ComputerWhite),
            2 => Some(Mode::ComputerBoth),
            3 => Some(Mode::HumanBoth),
            _ => None,
        }
    }

    fn computer_plays(self, colour: Colour) -> bool {
        matches!(
            (self, colour),
            (Mode::ComputerBlack, Colour::Black)
                | (Mode::ComputerWhite, Colour::White)
                | (Mode::ComputerBoth, _)
        )
    }
}

/// Main interactive loop.
///
/// Reads SAN moves and commands until `quit` or end of input. The computer
/// answers automatically according to the current mode.
///
/// # Arguments
/// * `options` - Search settings used for every computer move
pub fn ui_loop(options: SearchOptions) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut game = GameState::new();
    let mut mode = Mode::HumanBoth;

    loop {
        game.print();
        println!();

        let to_move = game.game().side_to_move();
        if mode.computer_plays(to_move) && !game.game().is_over() {
            if computer_move(&mut game, &options, false) {
                continue;
            }
            println!("Computer found no move; switching to mode 3.\n");
            mode = Mode::HumanBoth;
        }

        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        };
        let _ = rl.add_history_entry(&line);
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };
        println!();

        match cmd {
            "new" | "n" => game = GameState::new(),
            "fen" => {
                let fen = parts.collect::<Vec<_>>().join(" ");
                if fen.is_empty() {
                    println!("{}\n", game.game().to_fen());
                } else if let Err(err) = game.load_fen(&fen) {
                    eprintln!("{}\n", err.to_string().red());
                }
            }
            "moves" => {
                let moves = game.game().legal_moves();
                for (from, group) in moves.by_origin() {
                    let sans: Vec<&str> = group.iter().map(|mv| mv.san.as_str()).collect();
                    println!("{from}: {}", sans.join(" "));
                }
                println!();
            }
            "undo" | "u" => {
                if !game.undo() {
                    println!("Cannot undo.\n");
                }
            }
            "mode" | "m" => match parts.next().and_then(|s| s.parse().ok()) {
                Some(index) => match Mode::from_index(index) {
                    Some(m) => {
                        mode = m;
                        println!("Mode changed to: {index}\n");
                    }
                    None => println!("Invalid mode number. Please specify a value between 0-3.\n"),
                },
                None => {
                    println!("0: White-Human, Black-Computer");
                    println!("1: White-Computer, Black-Human");
                    println!("2: White-Computer, Black-Computer");
                    println!("3: White-Human, Black-Human\n");
                }
            },
            "go" => {
                if game.game().is_over() {
                    println!("Game over: {}\n", game.game().result());
                } else if !computer_move(&mut game, &options, true) {
                    println!("Computer found no move.\n");
                }
            }
            "quit" | "q" => break,
            san => {
                if !game.play(san) {
                    debug!(input = san, "unrecognised input");
                    eprintln!("{}\n", format!("Illegal move or unknown command: {san}").red());
                }
            }
        }
    }
    Ok(())
}

/// Searches and plays the best move.
///
/// # Returns
/// `false` if the search produced no playable move
fn computer_move(game: &mut GameState, options: &SearchOptions, verbose: bool) -> bool {
    let result = search::search(game.game(), options);
    if verbose {
        crate::print_ranking(&result);
        println!();
    }
    match result.best_move {
        Some(best) if game.play(&best) => {
            println!("Computer plays {}\n", best.bright_cyan());
            true
        }
        _ => false,
    }
}
