use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    thread,
    time::{Duration, Instant},
};

use log::debug;
use thiserror::Error;

use crate::{
    fen::FenError,
    move_gen::legality::all_legal_moves,
    position::{Position, PositionError},
    r#move::Move,
};

/// Represents errors that can occur during perft (performance test) operations.
///
/// # Variants
/// * `InvalidFen(String, FenError)` - The provided FEN string was invalid, with the original FEN string and the
///   specific parsing error
/// * `CorruptPosition(String, PositionError)` - The FEN was valid but the position does not have one king per side
#[derive(Error, Debug)]
pub enum PerftError {
    #[error("Invalid FEN ({0}): {1}")]
    InvalidFen(String, FenError),

    #[error("Corrupt position ({0}): {1}")]
    CorruptPosition(String, PositionError),
}

/// The result of a perft run.
#[derive(Debug, Clone)]
pub struct PerftReport {
    /// The node count below each legal move of the root position.
    pub divide: Vec<(Move, u64)>,
    /// The total node count.
    pub nodes: u64,
    pub duration: Duration,
}

impl PerftReport {
    /// Returns the number of nodes visited per second.
    pub fn nodes_per_second(&self) -> f64 {
        self.nodes as f64 / self.duration.as_secs_f64().max(f64::EPSILON)
    }
}

/// Counts the leaf nodes of the legal move tree of `position` down to `depth` plies.
pub fn perft(position: &Position, depth: u16) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = all_legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| {
            let mut child = position.clone();
            child.make(mv);
            perft(&child, depth - 1)
        })
        .sum()
}

/// Counts the leaf nodes below each legal move of `position`.
///
/// # Returns
/// One entry per legal move, in generation order. Empty when `depth` is 0.
pub fn divide(position: &Position, depth: u16) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    all_legal_moves(position)
        .into_iter()
        .map(|mv| {
            let mut child = position.clone();
            child.make(mv);
            (mv, perft(&child, depth - 1))
        })
        .collect()
}

/// Same as [`divide`], with the root moves spread across `threads` worker threads.
///
/// Workers pick the next unclaimed root move until none is left; each one works on its own clone of the position.
pub fn parallel_divide(position: &Position, depth: u16, threads: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = all_legal_moves(position);
    let next_index = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<u64>>> = Mutex::new(vec![None; moves.len()]);

    thread::scope(|scope| {
        for _ in 0..threads.max(1) {
            scope.spawn(|| loop {
                let index = next_index.fetch_add(1, Ordering::Relaxed);
                let Some(mv) = moves.get(index) else {
                    break;
                };

                let mut child = position.clone();
                child.make(*mv);
                let nodes = perft(&child, depth - 1);
                debug!("{}\t{}", mv.to_uci_string(), nodes);

                let mut results = results.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                results[index] = Some(nodes);
            });
        }
    });

    let results = results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    moves.into_iter().zip(results).map(|(mv, nodes)| (mv, nodes.unwrap_or(0))).collect()
}

/// Counts the leaf nodes of the legal move tree using `threads` worker threads.
pub fn parallel_perft(position: &Position, depth: u16, threads: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    parallel_divide(position, depth, threads).iter().map(|(_, nodes)| nodes).sum()
}

/// Runs a timed perft on the position described by `fen`.
///
/// # Parameters
/// * `fen` - The root position
/// * `depth` - The number of plies to explore
/// * `threads` - The number of worker threads; 1 runs everything on the calling thread
pub fn run_perft(fen: &str, depth: u16, threads: u32) -> Result<PerftReport, PerftError> {
    let position = Position::new_from_fen(fen).map_err(|e| PerftError::InvalidFen(fen.to_string(), e))?;
    position.validate().map_err(|e| PerftError::CorruptPosition(fen.to_string(), e))?;

    let start = Instant::now();
    let divide = if threads > 1 { parallel_divide(&position, depth, threads) } else { divide(&position, depth) };
    let nodes = if depth == 0 { 1 } else { divide.iter().map(|(_, nodes)| nodes).sum() };
    let duration = start.elapsed();

    Ok(PerftReport { divide, nodes, duration })
}
