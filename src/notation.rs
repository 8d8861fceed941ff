use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::{
    coordinates::{CoordinatesError, Square},
    move_gen::legality::find_legal_move,
    piece::{PieceError, PieceType},
    position::Position,
    r#move::Move,
};

/// Represents errors that can occur when parsing chess move notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Error when the source square coordinates in the notation are invalid.
    #[error("Invalid from square: {0}")]
    InvalidFromSquare(CoordinatesError),

    /// Error when the destination square coordinates in the notation are invalid.
    #[error("Invalid to square: {0}")]
    InvalidToSquare(CoordinatesError),

    /// Error when the promotion piece notation is invalid.
    #[error("Invalid promotion: {0}")]
    InvalidPromotion(PieceError),

    /// Error when the promotion letter names a piece a pawn cannot become.
    #[error("A pawn cannot promote to a {0}")]
    InvalidPromotionPiece(PieceType),

    /// Error when the overall notation format is incorrect.
    #[error("Invalid notation: {0:?}")]
    InvalidNotation(String),
}

/// A move as written in coordinate notation, before it is matched against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl CoordinateMove {
    /// Finds the legal move of `position` this notation describes.
    pub fn resolve(&self, position: &Position) -> Option<Move> {
        find_legal_move(position, self.from, self.to, self.promotion)
    }
}

impl Display for CoordinateMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", char::from(promotion).to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for CoordinateMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinate_notation(s)
    }
}

/// Parses a chess move in coordinate notation.
///
/// Coordinate notation represents moves as the source square followed by the destination square, optionally followed by
/// a promotion piece (e.g., "e2e4", "e7e8q"). The promotion letter is accepted in either case.
///
/// # Parameters
/// * `notation` - The move in coordinate notation (e.g., "e2e4", "e7e8q")
///
/// # Returns
/// * `Ok(CoordinateMove)` - The squares and promotion named by the notation
/// * `Err(NotationError)` - An error indicating why the notation could not be parsed
///
/// # Errors
/// * `InvalidFromSquare` - If the source square notation is invalid
/// * `InvalidToSquare` - If the destination square notation is invalid
/// * `InvalidPromotion` - If the promotion piece notation is invalid
/// * `InvalidPromotionPiece` - If the promotion names a king or a pawn
/// * `InvalidNotation` - If the notation does not have 4 or 5 characters
pub fn parse_coordinate_notation(notation: &str) -> Result<CoordinateMove, NotationError> {
    let chars: Vec<char> = notation.trim().chars().collect();
    if chars.len() != 4 && chars.len() != 5 {
        return Err(NotationError::InvalidNotation(notation.to_string()));
    }

    let from: String = chars[0..2].iter().collect();
    let from = Square::try_from(from.as_str()).map_err(NotationError::InvalidFromSquare)?;

    let to: String = chars[2..4].iter().collect();
    let to = Square::try_from(to.as_str()).map_err(NotationError::InvalidToSquare)?;

    let promotion = match chars.get(4) {
        Some(c) => {
            let piece_type = PieceType::try_from(*c).map_err(NotationError::InvalidPromotion)?;
            if !piece_type.is_promotion_target() {
                return Err(NotationError::InvalidPromotionPiece(piece_type));
            }
            Some(piece_type)
        }
        None => None,
    };

    Ok(CoordinateMove { from, to, promotion })
}
