use std::{fmt::Display, ops::Index, str::FromStr};

use thiserror::Error;

use crate::{
    coordinates::{File, Rank, Square},
    fen::{self, FenError},
    move_gen::attacks,
    piece::{Color, Piece, PieceType},
    r#move::{CastlingRight, Move, MoveType},
};

/// Errors raised when a position violates the structural invariants of a chess game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("The {0} king is missing from the board")]
    MissingKing(Color),

    #[error("There is more than one {0} king on the board")]
    MultipleKings(Color),

    #[error("The {0} king is in check but it is not {0}'s turn to move")]
    OpponentInCheck(Color),
}

//======================================================================================================================
// Position implementation
//======================================================================================================================

/// A chess position: the board plus everything needed to know which moves are legal from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    board: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling_rights: CastlingRight,
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Position {
    /// Creates an empty board, white to move, without castling rights.
    fn default() -> Self {
        Self {
            board: [None; Square::COUNT],
            side_to_move: Color::White,
            castling_rights: CastlingRight::empty(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Position {
    /// The FEN of the standard initial position.
    pub const INITIAL_FEN: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Creates a new chess position with the standard initial board setup.
    ///
    /// # Returns
    /// A new Position configured with the standard chess starting position
    /// (rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1).
    pub fn new() -> Self {
        Self::new_from_fen(Self::INITIAL_FEN)
            .expect("This can not fail because the INITIAL_FEN will always be successfully parsed.")
    }

    /// Creates a new chess position from a FEN (Forsyth-Edwards Notation) string.
    ///
    /// A FEN string contains 6 fields separated by spaces:
    ///
    /// 1. Piece placement: Each rank is described from 8 to 1, separated by '/'. Letters represent pieces (P=pawn,
    ///    N=knight, B=bishop, R=rook, Q=queen, K=king). Uppercase is white, lowercase is black. Numbers represent
    ///    empty squares.
    /// 2. Active color: "w" means White moves next, "b" means Black moves next.
    /// 3. Castling availability: a subset of "KQkq", or "-" if no castling is possible.
    /// 4. En passant target square in algebraic notation (e.g., "e3"), or "-".
    /// 5. Halfmove clock: number of halfmoves since the last pawn advance or capture.
    /// 6. Fullmove number: starts at 1 and increments after Black's move.
    ///
    /// # See also
    /// [The PGN specifications](https://ia902908.us.archive.org/26/items/pgn-standard-1994-03-12/PGN_standard_1994-03-12.txt)
    /// that defines the FEN format at section 16.1.
    pub fn new_from_fen(fen: &str) -> Result<Self, FenError> {
        fen::decode(fen)
    }

    /// Returns the FEN (Forsyth-Edwards Notation) representation of the position.
    pub fn to_fen(&self) -> String {
        fen::encode(self)
    }

    /// Assembles a position from already validated parts.
    pub(crate) fn from_parts(
        board: [Option<Piece>; Square::COUNT],
        side_to_move: Color,
        castling_rights: CastlingRight,
        en_passant_square: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Self { board, side_to_move, castling_rights, en_passant_square, halfmove_clock, fullmove_number }
    }

    /// Returns the color of the side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the castling availability of the position.
    pub fn castling_availability(&self) -> CastlingRight {
        self.castling_rights
    }

    /// Returns the en passant square of the position.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Returns the number of halfmoves since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the number of the current full move, starting at 1.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns an iterator over every occupied square and the piece standing on it.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL.into_iter().filter_map(move |square| self[square].map(|piece| (square, piece)))
    }

    /// Returns the square occupied by the king of the specified color, or `None` if there is no such king.
    ///
    /// When the board is corrupt and holds several kings of that color, the first one found from a1 is returned.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        self.pieces().find(|(_, piece)| *piece == king).map(|(square, _)| square)
    }

    /// Verifies that each side has exactly one king and that the side that just moved did not leave its king in
    /// check.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let king = Piece::new(color, PieceType::King);
            match self.pieces().filter(|(_, piece)| *piece == king).count() {
                0 => return Err(PositionError::MissingKing(color)),
                1 => {}
                _ => return Err(PositionError::MultipleKings(color)),
            }
        }

        let them = !self.side_to_move;
        if let Some(king_sq) = self.king_square(them) {
            if attacks::is_attacked(self, king_sq, self.side_to_move) {
                return Err(PositionError::OpponentInCheck(them));
            }
        }

        Ok(())
    }

    /// Places a chess piece on a specific square, replacing whatever stood there.
    pub fn put_piece(&mut self, piece: Piece, square: Square) {
        self.board[usize::from(square)] = Some(piece);
    }

    /// Removes and returns the piece standing on a square.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.board[usize::from(square)].take()
    }

    /// Moves the piece standing on `from` to `to`. Whatever stood on `to` is overwritten.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.remove_piece(from) {
            self.put_piece(piece, to);
        }
    }

    /// Determines if the side to move is in check. A side without a king is never in check.
    pub fn is_check(&self) -> bool {
        self.king_square(self.side_to_move)
            .is_some_and(|king_sq| attacks::is_attacked(self, king_sq, !self.side_to_move))
    }

    /// Returns the squares of every enemy piece giving check to the king of the side to move.
    pub fn checkers(&self) -> Vec<Square> {
        match self.king_square(self.side_to_move) {
            Some(king_sq) => attacks::attackers(self, king_sq, !self.side_to_move),
            None => Vec::new(),
        }
    }

    /// Makes a move on the board and updates the game state.
    ///
    /// This applies the move without checking its legality: callers must only pass moves produced by the move
    /// generator for this position. It handles every move type, updates castling rights, the en passant square and
    /// both clocks, then passes the turn to the other side.
    ///
    /// # Parameters
    /// * `mv` - The move to be executed on the board
    ///
    /// # Returns
    /// The piece that was captured by the move, if any.
    pub fn make(&mut self, mv: Move) -> Option<Piece> {
        let us = self.side_to_move;

        let captured = match mv.en_passant_capture_square() {
            Some(capture_sq) => self.remove_piece(capture_sq),
            None => self.remove_piece(mv.to_square()),
        };

        if let MoveType::Castling(side) = mv.move_type() {
            let (rook_from, rook_to) = side.rook_squares(us);
            self.move_piece(rook_from, rook_to);
        }

        self.remove_piece(mv.from_square());
        let landing = match mv.promotion() {
            Some(promotion) => Piece::new(us, promotion),
            None => mv.piece(),
        };
        self.put_piece(landing, mv.to_square());

        self.castling_rights &= !(CastlingRight::lost_on(mv.from_square()) | CastlingRight::lost_on(mv.to_square()));

        self.en_passant_square = match mv.move_type() {
            MoveType::TwoSquarePawnPush => mv.from_square().offset(0, us.forward()),
            _ => None,
        };

        if mv.is_capture() || mv.piece().piece_type() == PieceType::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = !us;

        captured
    }

    /// Returns true if neither side has enough material left to ever deliver checkmate: bare kings, a single minor
    /// piece, or only bishops that all stand on squares of the same color.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishops_on_dark = 0;
        let mut bishops_on_light = 0;

        for (square, piece) in self.pieces() {
            match piece.piece_type() {
                PieceType::King => {}
                PieceType::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceType::Bishop => {
                    minors += 1;
                    if square.is_dark() {
                        bishops_on_dark += 1;
                    } else {
                        bishops_on_light += 1;
                    }
                }
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
            }
        }

        minors <= 1 || (knights == 0 && (bishops_on_dark == 0 || bishops_on_light == 0))
    }

    /// Generates a compact string representation of the current chess position.
    ///
    /// The board is displayed from white's perspective with rank numbers on the left edge and file letters on the
    /// bottom. Empty squares are represented by dots.
    ///
    /// # Example Output
    ///
    /// 8  r n b q k b n r
    /// 7  p p p p p p p p
    /// 6  . . . . . . . .
    /// 5  . . . . . . . .
    /// 4  . . . . . . . .
    /// 3  . . . . . . . .
    /// 2  P P P P P P P P
    /// 1  R N B Q K B N R
    ///    a b c d e f g h
    ///
    pub fn to_compact_string(&self) -> String {
        let mut board = String::with_capacity(171);
        for rank in Rank::ALL.iter().rev() {
            board.push_str(&format!("{}  ", rank));
            for file in File::ALL {
                let sq = Square::new(file, *rank);
                match self[sq] {
                    Some(piece) => board.push(piece.into()),
                    None => board.push('.'),
                }
                if file != File::H {
                    board.push(' ');
                } else {
                    board.push('\n');
                }
            }
        }
        board.push_str("   a b c d e f g h");

        board
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.board[usize::from(index)]
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new_from_fen(s)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_default() {
        let position = Position::default();
        assert_eq!(position.pieces().count(), 0);
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling_availability(), CastlingRight::empty());
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn test_new_initial_position() {
        let position = Position::new();
        assert_eq!(position.pieces().count(), 32);
        assert_eq!(position[Square::E1], Some(Piece::WHITE_KING));
        assert_eq!(position[Square::D8], Some(Piece::BLACK_QUEEN));
        assert_eq!(position[Square::E4], None);
        assert_eq!(position.castling_availability(), CastlingRight::all());
        assert_eq!(position.to_fen(), Position::INITIAL_FEN);
    }

    #[test]
    fn test_put_and_remove_piece() {
        let mut position = Position::default();
        position.put_piece(Piece::WHITE_ROOK, Square::C3);
        assert_eq!(position[Square::C3], Some(Piece::WHITE_ROOK));
        assert_eq!(position.remove_piece(Square::C3), Some(Piece::WHITE_ROOK));
        assert_eq!(position[Square::C3], None);
        assert_eq!(position.remove_piece(Square::C3), None);
    }

    #[test]
    fn test_king_square_and_validate() {
        let position = Position::new();
        assert_eq!(position.king_square(Color::White), Some(Square::E1));
        assert_eq!(position.king_square(Color::Black), Some(Square::E8));
        assert_eq!(position.validate(), Ok(()));

        let position: Position = "8/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(position.king_square(Color::Black), None);
        assert_eq!(position.validate(), Err(PositionError::MissingKing(Color::Black)));

        let position: Position = "4k3/8/8/8/8/8/8/3KK3 w - - 0 1".parse().unwrap();
        assert_eq!(position.validate(), Err(PositionError::MultipleKings(Color::White)));
    }

    #[test]
    fn test_validate_rejects_king_capturable_by_side_to_move() {
        let position: Position = "4k3/8/8/8/8/8/4R3/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(position.validate(), Err(PositionError::OpponentInCheck(Color::Black)));

        // The side to move may be in check.
        let position: Position = "4k3/8/8/8/8/8/4R3/4K3 b - - 0 1".parse().unwrap();
        assert_eq!(position.validate(), Ok(()));
    }

    #[test]
    fn test_is_check_and_checkers() {
        let position: Position = "4k3/8/8/8/8/8/4r3/4K2b w - - 0 1".parse().unwrap();
        assert!(position.is_check());
        assert_eq!(position.checkers(), vec![Square::E2]);

        let position = Position::new();
        assert!(!position.is_check());
        assert!(position.checkers().is_empty());
    }

    #[test]
    fn test_make_two_square_pawn_push() {
        let mut position = Position::new();
        let captured = position.make(Move::new_two_square_pawn_push(Square::E2, Square::E4, Piece::WHITE_PAWN));
        assert_eq!(captured, None);
        assert_eq!(position.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    }

    #[test]
    fn test_make_knight_move_increments_clock() {
        let mut position = Position::new();
        position.make(Move::new(Square::G1, Square::F3, Piece::WHITE_KNIGHT));
        assert_eq!(position.to_fen(), "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1");
        position.make(Move::new(Square::G8, Square::F6, Piece::BLACK_KNIGHT));
        assert_eq!(position.halfmove_clock(), 2);
        assert_eq!(position.fullmove_number(), 2);
    }

    #[test]
    fn test_make_capture_resets_clock_and_clears_rights() {
        let mut position: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 7 20".parse().unwrap();
        let captured = position.make(Move::new_capture(Square::A1, Square::A8, Piece::WHITE_ROOK, Piece::BLACK_ROOK));
        assert_eq!(captured, Some(Piece::BLACK_ROOK));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.castling_availability(), CastlingRight::WHITE_KINGSIDE | CastlingRight::BLACK_KINGSIDE);
    }

    #[test]
    fn test_make_castling_moves_rook() {
        let mut position: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        position.make(Move::new_castling(
            Square::E1,
            Square::G1,
            Piece::WHITE_KING,
            crate::r#move::CastlingSide::Kingside,
        ));
        assert_eq!(position.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        position.make(Move::new_castling(
            Square::E8,
            Square::C8,
            Piece::BLACK_KING,
            crate::r#move::CastlingSide::Queenside,
        ));
        assert_eq!(position.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn test_make_en_passant_removes_pawn() {
        let mut position: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let captured = position.make(Move::new_en_passant(Square::E5, Square::D6, Piece::WHITE_PAWN));
        assert_eq!(captured, Some(Piece::BLACK_PAWN));
        assert_eq!(position[Square::D5], None);
        assert_eq!(position[Square::D6], Some(Piece::WHITE_PAWN));
        assert_eq!(position.en_passant_square(), None);
    }

    #[test]
    fn test_make_promotion() {
        let mut position: Position = "8/P7/8/8/8/8/8/k6K w - - 3 1".parse().unwrap();
        position.make(Move::new(Square::A7, Square::A8, Piece::WHITE_PAWN).with_promotion(PieceType::Queen));
        assert_eq!(position.to_fen(), "Q7/8/8/8/8/8/8/k6K b - - 0 1");
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4k1b1/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4kn2/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let position: Position = fen.parse().unwrap();
            assert_eq!(position.has_insufficient_material(), expected, "{fen}");
        }
    }

    #[test]
    fn test_to_compact_string() {
        let position = Position::new();
        let expected = "8  r n b q k b n r\n\
                        7  p p p p p p p p\n\
                        6  . . . . . . . .\n\
                        5  . . . . . . . .\n\
                        4  . . . . . . . .\n\
                        3  . . . . . . . .\n\
                        2  P P P P P P P P\n\
                        1  R N B Q K B N R\n   \
                        a b c d e f g h";
        assert_eq!(position.to_compact_string(), expected);
    }
}
