use crate::{
    fen::{self, FenError},
    position::Position,
};

/// The positions a game went through, stored as FEN snapshots taken before each move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from snapshots that were already validated.
    pub(crate) fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Records the position as it stands before a move is applied to it.
    pub fn snapshot_before_move(&mut self, position: &Position) {
        self.entries.push(fen::encode(position));
    }

    /// Removes the most recent snapshot and decodes it.
    ///
    /// # Returns
    /// * `None` if the history is empty.
    /// * `Some(Err(_))` if the snapshot could not be decoded; it is put back so the history is unchanged.
    /// * `Some(Ok(position))` with the position the snapshot described.
    pub fn undo(&mut self) -> Option<Result<Position, FenError>> {
        let entry = self.entries.pop()?;
        match fen::decode(&entry) {
            Ok(position) => Some(Ok(position)),
            Err(error) => {
                self.entries.push(entry);
                Some(Err(error))
            }
        }
    }

    /// Returns the snapshots, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coordinates::Square, piece::Piece, r#move::Move};

    #[test]
    fn test_new_history_is_empty() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_snapshot_and_undo() {
        let mut history = History::new();
        let mut position = Position::new();
        history.snapshot_before_move(&position);
        position.make(Move::new_two_square_pawn_push(Square::E2, Square::E4, Piece::WHITE_PAWN));
        history.snapshot_before_move(&position);

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0], Position::INITIAL_FEN);

        let previous = history.undo().unwrap().unwrap();
        assert_eq!(previous, position);
        let first = history.undo().unwrap().unwrap();
        assert_eq!(first, Position::new());
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_keeps_undecodable_entry() {
        let mut history = History::from_entries(vec![String::from("not a fen")]);
        assert!(matches!(history.undo(), Some(Err(FenError::WrongFieldCount(3)))));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.snapshot_before_move(&Position::new());
        history.clear();
        assert!(history.is_empty());
    }
}
