use std::fmt::Display;

use bitflags::bitflags;

use crate::{
    coordinates::{File, Rank, Square},
    piece::{Color, Piece, PieceType},
};

/// The two sides of the board a king can castle towards.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    pub const COUNT: usize = 2;
    pub const ALL: [CastlingSide; CastlingSide::COUNT] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// File the rook starts on.
    pub fn rook_file(self) -> File {
        match self {
            CastlingSide::Kingside => File::H,
            CastlingSide::Queenside => File::A,
        }
    }

    /// File the king lands on.
    pub fn king_destination_file(self) -> File {
        match self {
            CastlingSide::Kingside => File::G,
            CastlingSide::Queenside => File::C,
        }
    }

    /// File the rook lands on.
    pub fn rook_destination_file(self) -> File {
        match self {
            CastlingSide::Kingside => File::F,
            CastlingSide::Queenside => File::D,
        }
    }

    /// Returns the rook's origin and destination squares when `color` castles on this side.
    pub fn rook_squares(self, color: Color) -> (Square, Square) {
        let rank = Rank::R1.relative_to_color(color);
        (Square::new(self.rook_file(), rank), Square::new(self.rook_destination_file(), rank))
    }
}

bitflags! {
    /// The castling rights of both players.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CastlingRight: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRight {
    /// Returns the single right for `color` castling on `side`.
    pub fn new(color: Color, side: CastlingSide) -> Self {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => CastlingRight::WHITE_KINGSIDE,
            (Color::White, CastlingSide::Queenside) => CastlingRight::WHITE_QUEENSIDE,
            (Color::Black, CastlingSide::Kingside) => CastlingRight::BLACK_KINGSIDE,
            (Color::Black, CastlingSide::Queenside) => CastlingRight::BLACK_QUEENSIDE,
        }
    }

    /// Returns the rights lost when a piece leaves or lands on `square`.
    ///
    /// Moving a king from its origin square loses both of its rights; moving a rook from a corner, or capturing a
    /// piece standing there, loses the right tied to that corner.
    pub fn lost_on(square: Square) -> Self {
        match square {
            Square::E1 => CastlingRight::WHITE_KINGSIDE | CastlingRight::WHITE_QUEENSIDE,
            Square::H1 => CastlingRight::WHITE_KINGSIDE,
            Square::A1 => CastlingRight::WHITE_QUEENSIDE,
            Square::E8 => CastlingRight::BLACK_KINGSIDE | CastlingRight::BLACK_QUEENSIDE,
            Square::H8 => CastlingRight::BLACK_KINGSIDE,
            Square::A8 => CastlingRight::BLACK_QUEENSIDE,
            _ => CastlingRight::empty(),
        }
    }
}

/// The kind of a move, as far as applying it to a board is concerned.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MoveType {
    Basic,
    TwoSquarePawnPush,
    EnPassant,
    Castling(CastlingSide),
}

/// A move in a chess game.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move {
    from_square: Square,
    to_square: Square,
    piece: Piece,
    capture: Option<Piece>,
    promotion: Option<PieceType>,
    move_type: MoveType,
}

impl Move {
    /// Creates a basic move (no capture, no promotion).
    pub fn new(from_square: Square, to_square: Square, piece: Piece) -> Self {
        Self { from_square, to_square, piece, capture: None, promotion: None, move_type: MoveType::Basic }
    }

    /// Creates a move capturing the piece standing on the destination square.
    pub fn new_capture(from_square: Square, to_square: Square, piece: Piece, capture: Piece) -> Self {
        Self { capture: Some(capture), ..Self::new(from_square, to_square, piece) }
    }

    /// Creates a two-square pawn push.
    pub fn new_two_square_pawn_push(from_square: Square, to_square: Square, piece: Piece) -> Self {
        Self { move_type: MoveType::TwoSquarePawnPush, ..Self::new(from_square, to_square, piece) }
    }

    /// Creates an en passant capture. The captured pawn is not on the destination square.
    pub fn new_en_passant(from_square: Square, to_square: Square, piece: Piece) -> Self {
        Self {
            capture: Some(Piece::new(piece.color().opposite(), PieceType::Pawn)),
            move_type: MoveType::EnPassant,
            ..Self::new(from_square, to_square, piece)
        }
    }

    /// Creates a castling move, expressed as the king's move.
    pub fn new_castling(from_square: Square, to_square: Square, piece: Piece, side: CastlingSide) -> Self {
        Self { move_type: MoveType::Castling(side), ..Self::new(from_square, to_square, piece) }
    }

    /// Returns the same move promoting to `promotion`.
    pub fn with_promotion(self, promotion: PieceType) -> Self {
        Self { promotion: Some(promotion), ..self }
    }

    /// Returns the source square of the move.
    pub fn from_square(&self) -> Square {
        self.from_square
    }

    /// Returns the destination square of the move.
    pub fn to_square(&self) -> Square {
        self.to_square
    }

    /// Returns the piece that is moving.
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Returns the captured piece, if any.
    pub fn capture(&self) -> Option<Piece> {
        self.capture
    }

    /// Returns the piece type the pawn promotes to, if any.
    pub fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    /// Returns the type of move.
    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    pub fn is_castling(&self) -> bool {
        matches!(self.move_type, MoveType::Castling(_))
    }

    pub fn is_en_passant(&self) -> bool {
        self.move_type == MoveType::EnPassant
    }

    /// Returns the square of the pawn removed by an en passant capture.
    pub fn en_passant_capture_square(&self) -> Option<Square> {
        self.is_en_passant().then(|| Square::new(self.to_square.file(), self.from_square.rank()))
    }

    /// Returns the move in coordinate notation ("e2e4", "e7e8q").
    pub fn to_uci_string(&self) -> String {
        match self.promotion {
            Some(promotion) => format!(
                "{}{}{}",
                self.from_square,
                self.to_square,
                char::from(promotion).to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from_square, self.to_square),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci_string())
    }
}
