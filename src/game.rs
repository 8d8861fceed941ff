use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{
    coordinates::Square,
    fen::{self, FenError},
    history::History,
    move_gen::legality::{find_legal_move, legal_moves},
    notation::{parse_coordinate_notation, NotationError},
    piece::{Piece, PieceType},
    position::{Position, PositionError},
    r#move::Move,
    status::{self, DrawReason, GameStatus, StatusReport, FIFTY_MOVE_RULE_HALFMOVES},
};

/// Errors returned by the operations of a [`Game`]. The game is left unchanged whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid move from {from} to {to} (promotion: {promotion:?})")]
    InvalidMove { from: Square, to: Square, promotion: Option<PieceType> },

    #[error("Malformed FEN: {0}")]
    MalformedFen(#[from] FenError),

    #[error("The game is over ({0}), no move can be played")]
    IllegalOperationInTerminalState(GameStatus),

    #[error("Corrupt position: {0}")]
    CorruptPosition(#[from] PositionError),

    #[error("Invalid move notation: {0}")]
    InvalidNotation(#[from] NotationError),
}

/// The outcome of a successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The move that was played.
    pub mv: Move,
    /// The piece removed from the board, if any.
    pub captured: Option<Piece>,
    /// The status of the game for the side now to move.
    pub status: GameStatus,
}

/// A chess game: the current position, the positions that led to it and the current status.
///
/// Each game owns all of its state, so independent games can live side by side and be moved between threads.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    history: History,
    status: StatusReport,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the part of a FEN that identifies a position for repetition purposes: placement, side to move, castling
/// rights and en passant square.
fn repetition_key(fen: &str) -> Vec<&str> {
    fen.split_whitespace().take(4).collect()
}

impl Game {
    /// Creates a game starting from the standard initial position.
    pub fn new() -> Self {
        let position = Position::new();
        let status = status::evaluate(&position)
            .expect("This can not fail because the initial position always has exactly one king per side.");
        Self { position, history: History::new(), status }
    }

    /// Creates a game starting from the position described by `fen`.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let mut game = Self::new();
        game.load_fen(fen)?;
        Ok(game)
    }

    /// Resets the game to the standard initial position with an empty history.
    pub fn new_game(&mut self) {
        let Self { position, status, .. } = Self::new();
        self.position = position;
        self.status = status;
        self.history.clear();
        info!("Started a new game");
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the current status report.
    pub fn status(&self) -> &StatusReport {
        &self.status
    }

    /// Returns the FEN snapshots of the positions preceding the current one, oldest first.
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Returns the FEN of the current position.
    pub fn current_fen(&self) -> String {
        fen::encode(&self.position)
    }

    /// Returns the legal moves of the piece standing on `square`. Nothing can move once the game is over.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        if self.status.result.is_terminal() {
            return Vec::new();
        }
        legal_moves(&self.position, square)
    }

    /// Returns the distinct squares the piece standing on `square` can legally move to.
    ///
    /// A pawn about to promote reaches its destination with four different moves, which appear here as one square.
    pub fn legal_moves(&self, square: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = Vec::new();
        for mv in self.legal_moves_from(square) {
            if !destinations.contains(&mv.to_square()) {
                destinations.push(mv.to_square());
            }
        }
        destinations
    }

    /// Validates and applies a move, then recomputes the status of the game.
    ///
    /// # Parameters
    /// * `from` - The square of the piece to move
    /// * `to` - The destination square; for castling, the king's destination
    /// * `promotion` - The piece a pawn reaching the last rank becomes; must be `None` for every other move
    ///
    /// # Returns
    /// The applied move, the captured piece and the new status.
    ///
    /// # Errors
    /// * `IllegalOperationInTerminalState` - If the game is already over
    /// * `InvalidMove` - If no legal move matches the request
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<MoveResult, GameError> {
        if self.status.result.is_terminal() {
            return Err(GameError::IllegalOperationInTerminalState(self.status.result));
        }

        let mv = find_legal_move(&self.position, from, to, promotion)
            .ok_or(GameError::InvalidMove { from, to, promotion })?;

        let mut next = self.position.clone();
        let captured = next.make(mv);
        let next_status = status::evaluate(&next)?;

        self.history.snapshot_before_move(&self.position);
        self.position = next;
        self.status = next_status;

        debug!("Applied move {} ({})", mv, self.status.result);

        Ok(MoveResult { mv, captured, status: self.status.result })
    }

    /// Parses a move in coordinate notation ("e2e4", "e7e8q") and applies it.
    pub fn apply_coordinate_move(&mut self, notation: &str) -> Result<MoveResult, GameError> {
        let coordinate_move = parse_coordinate_notation(notation)?;
        self.apply_move(coordinate_move.from, coordinate_move.to, coordinate_move.promotion)
    }

    /// Takes back the last move.
    ///
    /// # Returns
    /// False if there was no move to take back, or if the stored snapshot could not be restored.
    pub fn undo(&mut self) -> bool {
        let position = match self.history.undo() {
            None => return false,
            Some(Ok(position)) => position,
            Some(Err(e)) => {
                error!("Unable to restore the previous position: {}", e);
                return false;
            }
        };

        match status::evaluate(&position) {
            Ok(status) => {
                debug!("Took back a move, back to {}", fen::encode(&position));
                self.position = position;
                self.status = status;
                true
            }
            Err(e) => {
                error!("Unable to restore the previous position: {}", e);
                self.history.snapshot_before_move(&position);
                false
            }
        }
    }

    /// Replaces the current position with the one described by `fen` and clears the history.
    ///
    /// # Errors
    /// * `MalformedFen` - If the FEN could not be decoded
    /// * `CorruptPosition` - If either side does not have exactly one king, or the side not to move is in check
    pub fn load_fen(&mut self, fen: &str) -> Result<(), GameError> {
        self.load_game(fen, &[])
    }

    /// Replaces the current position and its history.
    ///
    /// Every snapshot of `history` is decoded and validated before anything changes, so the load either fully succeeds
    /// or leaves the game untouched. Snapshots are stored in their canonical form.
    ///
    /// # Parameters
    /// * `fen` - The current position
    /// * `history` - The positions preceding it, oldest first
    pub fn load_game(&mut self, fen: &str, history: &[String]) -> Result<(), GameError> {
        let (position, status) = Self::decode_and_evaluate(fen).inspect_err(|e| {
            warn!("Rejected position {:?}: {}", fen, e);
        })?;

        let mut entries = Vec::with_capacity(history.len());
        for entry in history {
            let snapshot = fen::decode(entry).map_err(GameError::from).and_then(|snapshot| {
                snapshot.validate()?;
                Ok(snapshot)
            });
            match snapshot {
                Ok(snapshot) => entries.push(fen::encode(&snapshot)),
                Err(e) => {
                    warn!("Rejected history entry {:?}: {}", entry, e);
                    return Err(e);
                }
            }
        }

        self.position = position;
        self.status = status;
        self.history = History::from_entries(entries);

        info!("Loaded position {} with {} previous positions", self.current_fen(), self.history.len());

        Ok(())
    }

    fn decode_and_evaluate(fen: &str) -> Result<(Position, StatusReport), GameError> {
        let position = fen::decode(fen)?;
        let status = status::evaluate(&position)?;
        Ok((position, status))
    }

    /// Returns how many times the current position occurred in the game, counting the current occurrence.
    ///
    /// Two positions are the same when their placement, side to move, castling rights and en passant square match.
    pub fn repetition_count(&self) -> usize {
        let current = self.current_fen();
        let key = repetition_key(&current);
        1 + self.history.entries().iter().filter(|entry| repetition_key(entry) == key).count()
    }

    /// Returns the reason a player could claim a draw in the current position, if any.
    ///
    /// Claims are informational: they never end the game by themselves.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        if self.position.halfmove_clock() >= FIFTY_MOVE_RULE_HALFMOVES {
            Some(DrawReason::FiftyMoveRule)
        } else if self.repetition_count() >= 3 {
            Some(DrawReason::ThreefoldRepetition)
        } else if self.position.has_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else {
            None
        }
    }
}
