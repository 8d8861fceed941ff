use thiserror::Error;

use crate::{
    coordinates::{File, Rank, Square},
    piece::{Color, Piece, PieceType},
    position::Position,
    r#move::{CastlingRight, CastlingSide},
};

/// Errors raised while decoding a FEN (Forsyth-Edwards Notation) string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("A FEN string must have 6 fields, found {0}")]
    WrongFieldCount(usize),

    #[error("The piece placement must describe 8 ranks, found {0}")]
    WrongRankCount(usize),

    #[error("Rank {0} does not describe exactly 8 files")]
    InvalidRankLength(Rank),

    #[error("Invalid piece character: {0:?}")]
    InvalidPiece(char),

    #[error("Invalid side to move: {0:?}")]
    InvalidSideToMove(String),

    #[error("Invalid castling availability: {0:?}")]
    InvalidCastling(String),

    #[error("Invalid en passant square: {0:?}")]
    InvalidEnPassantSquare(String),

    #[error("Invalid halfmove clock: {0:?}")]
    InvalidHalfmoveClock(String),

    #[error("Invalid fullmove number: {0:?}")]
    InvalidFullmoveNumber(String),
}

/// The castling letters in the order they are written.
const CASTLING_LETTERS: [(char, CastlingRight); 4] = [
    ('K', CastlingRight::WHITE_KINGSIDE),
    ('Q', CastlingRight::WHITE_QUEENSIDE),
    ('k', CastlingRight::BLACK_KINGSIDE),
    ('q', CastlingRight::BLACK_QUEENSIDE),
];

//======================================================================================================================
// Decoding
//======================================================================================================================

fn read_piece_placement(piece_placement: &str) -> Result<[Option<Piece>; Square::COUNT], FenError> {
    let ranks: Vec<&str> = piece_placement.split('/').collect();
    if ranks.len() != Rank::COUNT {
        return Err(FenError::WrongRankCount(ranks.len()));
    }

    let mut board = [None; Square::COUNT];
    for (rank, description) in Rank::ALL.iter().rev().zip(ranks) {
        let mut file_index = 0usize;
        for c in description.chars() {
            if let Some(empty) = c.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(FenError::InvalidRankLength(*rank));
                }
                file_index += empty as usize;
            } else {
                let piece = Piece::try_from(c).map_err(|_| FenError::InvalidPiece(c))?;
                if file_index >= File::COUNT {
                    return Err(FenError::InvalidRankLength(*rank));
                }
                board[usize::from(Square::new(File::ALL[file_index], *rank))] = Some(piece);
                file_index += 1;
            }

            if file_index > File::COUNT {
                return Err(FenError::InvalidRankLength(*rank));
            }
        }

        if file_index != File::COUNT {
            return Err(FenError::InvalidRankLength(*rank));
        }
    }

    Ok(board)
}

fn read_side_to_move(side_to_move: &str) -> Result<Color, FenError> {
    match side_to_move {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::InvalidSideToMove(side_to_move.to_string())),
    }
}

fn read_castling(castling_availability: &str) -> Result<CastlingRight, FenError> {
    if castling_availability == "-" {
        return Ok(CastlingRight::empty());
    }

    let invalid = || FenError::InvalidCastling(castling_availability.to_string());
    if castling_availability.is_empty() {
        return Err(invalid());
    }

    let mut rights = CastlingRight::empty();
    for c in castling_availability.chars() {
        let right = CASTLING_LETTERS.iter().find(|(letter, _)| *letter == c).map(|(_, right)| *right).ok_or_else(invalid)?;
        if rights.contains(right) {
            return Err(invalid());
        }
        rights |= right;
    }

    Ok(rights)
}

/// Drops the castling rights whose king or rook is not on its original square, since they can never be used.
fn retain_castling_rights(board: &[Option<Piece>; Square::COUNT], rights: CastlingRight) -> CastlingRight {
    let mut retained = CastlingRight::empty();
    for color in Color::ALL {
        let king_sq = Square::new(File::E, Rank::R1.relative_to_color(color));
        if board[usize::from(king_sq)] != Some(Piece::new(color, PieceType::King)) {
            continue;
        }

        for side in CastlingSide::ALL {
            let right = CastlingRight::new(color, side);
            let (rook_sq, _) = side.rook_squares(color);
            if rights.contains(right) && board[usize::from(rook_sq)] == Some(Piece::new(color, PieceType::Rook)) {
                retained |= right;
            }
        }
    }
    retained
}

fn read_en_passant_square(en_passant_square: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
    if en_passant_square == "-" {
        return Ok(None);
    }

    let invalid = || FenError::InvalidEnPassantSquare(en_passant_square.to_string());
    let square = Square::try_from(en_passant_square).map_err(|_| invalid())?;

    // The target lies behind a pawn of the side that just moved.
    let expected_rank = Rank::R6.relative_to_color(side_to_move);
    if square.rank() != expected_rank {
        return Err(invalid());
    }

    Ok(Some(square))
}

fn read_halfmove_clock(halfmove_clock: &str) -> Result<u32, FenError> {
    halfmove_clock.parse().map_err(|_| FenError::InvalidHalfmoveClock(halfmove_clock.to_string()))
}

fn read_fullmove_number(fullmove_number: &str) -> Result<u32, FenError> {
    match fullmove_number.parse::<u32>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(FenError::InvalidFullmoveNumber(fullmove_number.to_string())),
    }
}

/// Decodes a FEN string into a position.
///
/// The six fields are all mandatory and each one is validated. Castling rights whose king or rook has left its
/// original square are dropped. The resulting position is not checked for the presence of kings; see
/// `Position::validate` for that.
///
/// # Parameters
/// * `fen` - The FEN string to decode.
///
/// # Returns
/// The decoded position, or the first problem found in the string.
pub fn decode(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let [piece_placement, side_to_move, castling, en_passant, halfmove_clock, fullmove_number] = fields[..] else {
        return Err(FenError::WrongFieldCount(fields.len()));
    };

    let board = read_piece_placement(piece_placement)?;
    let side_to_move = read_side_to_move(side_to_move)?;
    let castling_rights = retain_castling_rights(&board, read_castling(castling)?);
    let en_passant_square = read_en_passant_square(en_passant, side_to_move)?;
    let halfmove_clock = read_halfmove_clock(halfmove_clock)?;
    let fullmove_number = read_fullmove_number(fullmove_number)?;

    Ok(Position::from_parts(board, side_to_move, castling_rights, en_passant_square, halfmove_clock, fullmove_number))
}

//======================================================================================================================
// Encoding
//======================================================================================================================

fn write_piece_placement(position: &Position) -> String {
    let mut result = String::with_capacity(70);
    for rank in Rank::ALL.iter().rev() {
        let mut empty_count = 0;
        for file in File::ALL {
            let square = Square::new(file, *rank);
            if let Some(piece) = position[square] {
                if empty_count > 0 {
                    result.push_str(&empty_count.to_string());
                    empty_count = 0;
                }
                result.push(piece.into());
            } else {
                empty_count += 1;
            }
        }
        if empty_count > 0 {
            result.push_str(&empty_count.to_string());
        }
        if rank != &Rank::R1 {
            result.push('/');
        }
    }
    result
}

fn write_castling(rights: CastlingRight) -> String {
    if rights.is_empty() {
        return String::from("-");
    }

    CASTLING_LETTERS.iter().filter(|(_, right)| rights.contains(*right)).map(|(letter, _)| *letter).collect()
}

/// Encodes a position as a FEN string.
///
/// Castling rights are always written in `KQkq` order and the en passant square is written whenever it is set.
pub fn encode(position: &Position) -> String {
    let en_passant = match position.en_passant_square() {
        Some(square) => square.to_string(),
        None => String::from("-"),
    };

    format!(
        "{} {} {} {} {} {}",
        write_piece_placement(position),
        char::from(position.side_to_move()),
        write_castling(position.castling_availability()),
        en_passant,
        position.halfmove_clock(),
        position.fullmove_number()
    )
}
