use std::io::{self, BufRead, Write};

use chess_rules::{
    config::{self, get_config},
    coordinates::{CoordinatesError, Square},
    game::Game,
    logging,
    move_gen::legality::{all_legal_moves, legal_moves},
    perft::{run_perft, PerftReport},
    position::Position,
};
use clap::Parser;
use colored::Colorize;
use thiserror::Error;

#[derive(Error, Debug)]
enum ChessRulesError {
    #[error("Error during the perft command: {0}")]
    PerftError(#[from] chess_rules::perft::PerftError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] chess_rules::config::ConfigError),

    #[error("Unable to install the logger: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    #[error("Invalid FEN: {0}")]
    FenError(#[from] chess_rules::fen::FenError),

    #[error("Invalid square: {0}")]
    SquareError(#[from] CoordinatesError),

    #[error("Game error: {0}")]
    GameError(#[from] chess_rules::game::GameError),

    #[error("Input/output error: {0}")]
    IoError(#[from] io::Error),
}

mod arguments {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    /// Chess rules engine: move validation, game status and FEN tools
    #[derive(Parser)]
    #[command(name = "chess_rules", version, about = "Chess rules engine: move validation, game status and FEN tools")]
    pub struct ChessRulesArgs {
        /// Path of the configuration file
        #[arg(short, long, global = true, default_value = "chess_rules.toml")]
        pub config: PathBuf,

        #[command(subcommand)]
        pub command: Commands,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Commands {
        /// Calculate the perft of a position
        Perft {
            /// The depth to calculate the perft
            #[arg(short, long)]
            depth: u16,

            /// FEN string representing the position to calculate the perft
            #[arg(short, long, default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")]
            fen: String,

            /// The number of threads to use for the perft calculation
            #[arg(short, long)]
            threads: Option<u32>,
        },

        /// List the legal moves of a position
        Moves {
            /// FEN string representing the position
            #[arg(short, long, default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")]
            fen: String,

            /// Only list the moves of the piece on this square
            #[arg(short, long)]
            square: Option<String>,
        },

        /// Play a game on the terminal, one command per line
        Play {
            /// FEN string of the starting position
            #[arg(short, long)]
            fen: Option<String>,
        },
    }
}

fn print_perft_report(depth: u16, position: &Position, report: &PerftReport) {
    println!("Perft ({}) for position:\n\n{}\n", depth, position.to_compact_string());
    for (mv, nodes) in &report.divide {
        println!("{}\t{}", mv.to_uci_string(), nodes);
    }
    println!("\nNodes: {}", report.nodes);
    println!("Time: {:.3}", report.duration.as_secs_f64());
    println!("Nodes per second: {:.0}", report.nodes_per_second());
}

fn print_moves(fen: &str, square: Option<String>) -> Result<(), ChessRulesError> {
    let position = Position::new_from_fen(fen)?;
    let moves = match square {
        Some(square) => legal_moves(&position, Square::try_from(square.as_str())?),
        None => all_legal_moves(&position),
    };

    for mv in &moves {
        match mv.capture() {
            Some(captured) => println!("{}\tcaptures {}", mv.to_uci_string(), captured),
            None => println!("{}", mv.to_uci_string()),
        }
    }
    println!("\n{} moves", moves.len());

    Ok(())
}

fn print_status(game: &Game) {
    let status = game.status();
    let mut line = format!("{} to move: {}", game.position().side_to_move(), status.result);
    if !status.checkers.is_empty() {
        let checkers: Vec<String> = status.checkers.iter().map(|sq| sq.to_string()).collect();
        line.push_str(&format!(" (checked by {})", checkers.join(", ")));
    }
    if let Some(reason) = game.claimable_draw() {
        line.push_str(&format!(", a draw by {} can be claimed", reason));
    }
    println!("{}", line.bold());
}

const PLAY_HELP: &str = "Commands: <move> (e2e4, e7e8q), undo, fen, board, status, moves <square>, history, new, \
                         load <fen>, help, quit";

/// Executes one line of the play session.
///
/// # Returns
/// False when the session should end.
fn play_command(game: &mut Game, line: &str) -> bool {
    let (command, argument) = match line.split_once(' ') {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "quit" | "exit" => return false,
        "help" => println!("{}", PLAY_HELP),
        "undo" => {
            if game.undo() {
                print_status(game);
            } else {
                println!("{}", "Nothing to undo".yellow());
            }
        }
        "fen" => println!("{}", game.current_fen()),
        "board" => println!("{}", game.position().to_compact_string()),
        "status" => print_status(game),
        "history" => {
            for (index, fen) in game.history().iter().enumerate() {
                println!("{:>4}  {}", index + 1, fen);
            }
        }
        "new" => {
            game.new_game();
            print_status(game);
        }
        "load" => match game.load_fen(argument) {
            Ok(()) => print_status(game),
            Err(e) => println!("{}", e.to_string().red()),
        },
        "moves" => match Square::try_from(argument) {
            Ok(square) => {
                let destinations: Vec<String> = game.legal_moves(square).iter().map(|sq| sq.to_string()).collect();
                println!("{}", destinations.join(" "));
            }
            Err(e) => println!("{}", e.to_string().red()),
        },
        notation => match game.apply_coordinate_move(notation) {
            Ok(result) => {
                if let Some(captured) = result.captured {
                    println!("{} captures {}", result.mv, captured);
                }
                print_status(game);
            }
            Err(e) => println!("{}", e.to_string().red()),
        },
    }

    true
}

fn play(fen: Option<String>) -> Result<(), ChessRulesError> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(&fen)?,
        None => Game::new(),
    };

    println!("{}\n", PLAY_HELP);
    println!("{}\n", game.position().to_compact_string());
    print_status(&game);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        if !play_command(&mut game, line?.trim()) {
            break;
        }
    }

    Ok(())
}

fn run() -> Result<(), ChessRulesError> {
    // Parse command line arguments
    let args = arguments::ChessRulesArgs::parse();

    // Read the configuration and install the logger
    config::initialize(args.config)?;
    let config = get_config()?;
    logging::initialize(config.log_level_filter()?)?;

    // Run the command
    match args.command {
        arguments::Commands::Perft { depth, fen, threads } => {
            let report = run_perft(&fen, depth, threads.unwrap_or(config.perft_threads))?;
            let position = Position::new_from_fen(&fen)?;
            print_perft_report(depth, &position, &report);
        }
        arguments::Commands::Moves { fen, square } => print_moves(&fen, square)?,
        arguments::Commands::Play { fen } => play(fen)?,
    }

    Ok(())
}

/// Main entry point for the chess_rules tools.
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
