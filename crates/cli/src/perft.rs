//! Perft and divide output with timing.

use std::time::Instant;

use chess_core::Game;
use chess_core::perft::{perft, perft_divide};
use colored::Colorize;
use num_format::{Locale, ToFormattedString};

/// Runs perft from `game` to each depth up to `depth`, or a divide at
/// `depth` when `divide` is set.
pub fn run(game: &Game, depth: u32, divide: bool) {
    let board = game.board();
    let colour = game.side_to_move();

    if divide {
        let start = Instant::now();
        let counts = perft_divide(board, colour, depth);
        let elapsed = start.elapsed();
        for (san, nodes) in &counts {
            println!("{san:<8} {}", nodes.to_formatted_string(&Locale::en));
        }
        let total: u64 = counts.iter().map(|(_, nodes)| nodes).sum();
        println!();
        println!(
            "{} moves, {} nodes in {:.3}s",
            counts.len(),
            total.to_formatted_string(&Locale::en).bright_green(),
            elapsed.as_secs_f64()
        );
        return;
    }

    println!("depth |          nodes |   time (s) |      nps");
    println!("------+----------------+------------+---------");
    for d in 1..=depth {
        let start = Instant::now();
        let nodes = perft(board, colour, d);
        let secs = start.elapsed().as_secs_f64();
        let nps = if secs > 0.0 {
            (nodes as f64 / secs) as u64
        } else {
            0
        };
        println!(
            "{d:>5} | {:>14} | {secs:>10.3} | {}",
            nodes.to_formatted_string(&Locale::en),
            nps.to_formatted_string(&Locale::en)
        );
    }
}
