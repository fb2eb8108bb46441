mod game;
mod perft;
mod ui;

use anyhow::{Context, Result, bail};
use chess_core::analysis;
use chess_core::level::{self, DEFAULT_LEVEL};
use chess_core::search::{self, SearchOptions};
use chess_core::{Colour, Game};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
struct EngineParams {
    /// Preset strength, 0 (weakest) to 10.
    #[arg(short, long, default_value_t = DEFAULT_LEVEL)]
    level: usize,

    /// Override the level's simulation count.
    #[arg(long)]
    simulations: Option<u32>,

    /// Override the level's tree depth.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    tree_depth: Option<u32>,

    /// Override the level's rollout depth.
    #[arg(long)]
    rollout_depth: Option<u32>,

    /// Softmax temperature for rollout moves; 0 plays greedily.
    #[arg(long)]
    temperature: Option<f64>,

    /// Seed for a reproducible search.
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl EngineParams {
    fn search_options(&self) -> Result<SearchOptions> {
        let Some(level) = level::get_level(self.level) else {
            bail!(
                "level {} is out of range (0-{})",
                self.level,
                level::level_count() - 1
            );
        };
        let options = SearchOptions::from_level(level)
            .with_simulations(self.simulations)
            .with_tree_depth(self.tree_depth)
            .with_rollout_depth(self.rollout_depth)
            .with_temperature(self.temperature)
            .with_seed(self.seed);
        debug!(level = self.level, ?options, "search options");
        Ok(options)
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Chess rules engine with Monte Carlo move ranking")]
struct Cli {
    #[command(subcommand)]
    command: Option<SubCommands>,

    #[command(flatten)]
    engine_params: EngineParams,
}

#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Count leaf nodes of the legal move tree.
    Perft {
        /// Plies to expand.
        #[arg(short, long, default_value_t = 4)]
        depth: u32,

        /// Position to start from.
        #[arg(long, default_value = chess_core::START_FEN)]
        fen: String,

        /// Report the count below each root move.
        #[arg(long)]
        divide: bool,
    },
    /// Rank the moves of a position with Monte Carlo search.
    Best {
        #[arg(long, default_value = chess_core::START_FEN)]
        fen: String,
    },
    /// Print centre of mass and cognitive load for both sides.
    Analyze {
        #[arg(long, default_value = chess_core::START_FEN)]
        fen: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.engine_params.log_level)?;

    match args.command {
        Some(SubCommands::Perft { depth, fen, divide }) => {
            let game = parse_fen(&fen)?;
            perft::run(&game, depth, divide);
        }
        Some(SubCommands::Best { fen }) => {
            let game = parse_fen(&fen)?;
            let options = args.engine_params.search_options()?;
            best(&game, &options);
        }
        Some(SubCommands::Analyze { fen }) => {
            let game = parse_fen(&fen)?;
            analyze(&game);
        }
        None => {
            let options = args.engine_params.search_options()?;
            ui::ui_loop(options).context("interactive session failed")?;
        }
    }
    Ok(())
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter '{default_filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn parse_fen(fen: &str) -> Result<Game> {
    Game::from_fen(fen).with_context(|| format!("cannot load FEN '{fen}'"))
}

fn best(game: &Game, options: &SearchOptions) {
    if game.is_over() {
        println!("Game over: {}", game.result());
        return;
    }
    let result = search::search(game, options);
    print_ranking(&result);
}

/// Prints the ranked root moves of a search, best first.
pub(crate) fn print_ranking(result: &search::SearchResult) {
    println!(" move    | visits | win rate");
    println!("---------+--------+---------");
    for (i, rm) in result.ranked.iter().enumerate() {
        let line = format!("{:<8} | {:>6} | {:>7.3}", rm.san, rm.visits, rm.win_rate);
        if i == 0 {
            println!(" {}", line.bright_green());
        } else {
            println!(" {line}");
        }
    }
    println!();
    println!("{} simulations, {} nodes", result.simulations, result.n_nodes);
    if let Some(best) = &result.best_move {
        println!("Best move: {}", best.bright_cyan());
    }
}

fn analyze(game: &Game) {
    let board = game.board();
    for colour in Colour::ALL {
        println!("{}", colour.to_string().bold());
        for (label, weighted) in [("centre of mass", true), ("centre (uniform)", false)] {
            match analysis::centre_of_mass(board, colour, weighted) {
                Some((file, rank)) => println!("  {label:<17} file {file:.2}, rank {rank:.2}"),
                None => println!("  {label:<17} -"),
            }
        }
        println!(
            "  {:<17} {:.1}",
            "cognitive load",
            analysis::cognitive_load(board, colour)
        );
    }
}
