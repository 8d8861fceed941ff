use std::fmt::Display;

use crate::{
    coordinates::Square,
    move_gen::legality::has_legal_moves,
    position::{Position, PositionError},
};

/// Number of halfmoves without capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_RULE_HALFMOVES: u32 = 100;

/// The reason a game ended, or could end, in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl Display for DrawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawReason::FiftyMoveRule => write!(f, "fifty-move rule"),
            DrawReason::ThreefoldRepetition => write!(f, "threefold repetition"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// The state of a game, from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    /// Returns true if no more moves can be played.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_))
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

/// Everything the status evaluation learned about a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub in_check: bool,
    pub has_legal_moves: bool,
    /// Squares of the enemy pieces giving check.
    pub checkers: Vec<Square>,
    pub result: GameStatus,
}

/// Evaluates the status of the side to move.
///
/// Checkmate and stalemate take precedence over the fifty-move rule, which takes precedence over a simple check.
///
/// # Returns
/// The status report, or an error if either side does not have exactly one king.
pub fn evaluate(position: &Position) -> Result<StatusReport, PositionError> {
    position.validate()?;

    let checkers = position.checkers();
    let in_check = !checkers.is_empty();
    let has_legal_moves = has_legal_moves(position);

    let result = match (in_check, has_legal_moves) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        _ if position.halfmove_clock() >= FIFTY_MOVE_RULE_HALFMOVES => GameStatus::Draw(DrawReason::FiftyMoveRule),
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Ongoing,
    };

    Ok(StatusReport { in_check, has_legal_moves, checkers, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn evaluate_fen(fen: &str) -> Result<StatusReport, PositionError> {
        evaluate(&Position::new_from_fen(fen).unwrap())
    }

    #[test]
    fn test_initial_position_is_ongoing() {
        let report = evaluate(&Position::new()).unwrap();
        assert_eq!(
            report,
            StatusReport { in_check: false, has_legal_moves: true, checkers: vec![], result: GameStatus::Ongoing }
        );
    }

    #[test]
    fn test_check() {
        let report = evaluate_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert_eq!(report.result, GameStatus::Check);
        assert_eq!(report.checkers, vec![Square::A1]);
    }

    #[test]
    fn test_checkmate() {
        let report = evaluate_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert_eq!(report.result, GameStatus::Checkmate);
        assert!(report.in_check);
        assert!(!report.has_legal_moves);
        assert!(report.result.is_terminal());
    }

    #[test]
    fn test_stalemate() {
        let report = evaluate_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(report.result, GameStatus::Stalemate);
        assert!(!report.in_check);
    }

    #[test]
    fn test_fifty_move_rule() {
        let report = evaluate_fen("4k1n1/8/8/8/8/8/8/4K1N1 w - - 99 50").unwrap();
        assert_eq!(report.result, GameStatus::Ongoing);

        let report = evaluate_fen("4k1n1/8/8/8/8/8/8/4K1N1 w - - 100 51").unwrap();
        assert_eq!(report.result, GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn test_checkmate_beats_fifty_move_rule() {
        let report = evaluate_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 100 80").unwrap();
        assert_eq!(report.result, GameStatus::Checkmate);
    }

    #[test]
    fn test_corrupt_positions() {
        assert_eq!(evaluate_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"), Err(PositionError::MissingKing(Color::Black)));
        assert_eq!(evaluate_fen("k7/8/8/8/8/8/8/8 w - - 0 1"), Err(PositionError::MissingKing(Color::White)));
        assert_eq!(
            evaluate_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1"),
            Err(PositionError::OpponentInCheck(Color::Black))
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GameStatus::Draw(DrawReason::FiftyMoveRule).to_string(), "draw by fifty-move rule");
        assert!(!GameStatus::Check.is_terminal());
    }
}
