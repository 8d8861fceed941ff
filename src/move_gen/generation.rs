use crate::{
    coordinates::{File, Rank, Square},
    piece::{Piece, PieceType},
    position::Position,
    r#move::{CastlingRight, CastlingSide, Move},
};

use super::attacks::{self, Direction};

/// Adds a pawn move to the list, expanding it into the four promotions when it reaches the last rank.
fn add_pawn_move(mv: Move, list: &mut Vec<Move>) {
    if mv.to_square().rank() == Rank::R8.relative_to_color(mv.piece().color()) {
        list.extend(PieceType::PROMOTIONS.iter().map(|promotion| mv.with_promotion(*promotion)));
    } else {
        list.push(mv);
    }
}

fn generate_pawn_moves(position: &Position, from_sq: Square, piece: Piece, list: &mut Vec<Move>) {
    let us = piece.color();
    let forward = us.forward();

    // Pushes
    if let Some(one_step) = from_sq.offset(0, forward) {
        if position[one_step].is_none() {
            add_pawn_move(Move::new(from_sq, one_step, piece), list);

            if from_sq.rank() == Rank::R2.relative_to_color(us) {
                if let Some(two_steps) = one_step.offset(0, forward) {
                    if position[two_steps].is_none() {
                        list.push(Move::new_two_square_pawn_push(from_sq, two_steps, piece));
                    }
                }
            }
        }
    }

    // Captures
    for file_delta in [-1, 1] {
        let Some(to_sq) = from_sq.offset(file_delta, forward) else {
            continue;
        };

        match position[to_sq] {
            Some(target) if target.color() != us => {
                add_pawn_move(Move::new_capture(from_sq, to_sq, piece, target), list)
            }
            Some(_) => {}
            None if position.en_passant_square() == Some(to_sq) => {
                let captured_sq = Square::new(to_sq.file(), from_sq.rank());
                if position[captured_sq] == Some(Piece::new(!us, PieceType::Pawn)) {
                    list.push(Move::new_en_passant(from_sq, to_sq, piece));
                }
            }
            None => {}
        }
    }
}

/// Adds a move to `to_sq` unless it is occupied by a piece of the mover's color.
///
/// # Returns
/// True if `to_sq` was empty, which lets sliding pieces continue along their ray.
fn add_step(position: &Position, from_sq: Square, to_sq: Square, piece: Piece, list: &mut Vec<Move>) -> bool {
    match position[to_sq] {
        None => {
            list.push(Move::new(from_sq, to_sq, piece));
            true
        }
        Some(target) => {
            if target.color() != piece.color() {
                list.push(Move::new_capture(from_sq, to_sq, piece, target));
            }
            false
        }
    }
}

fn generate_slider_moves(
    position: &Position,
    from_sq: Square,
    piece: Piece,
    directions: &[Direction],
    list: &mut Vec<Move>,
) {
    for direction in directions {
        for to_sq in attacks::ray(from_sq, *direction) {
            if !add_step(position, from_sq, *to_sq, piece, list) {
                break;
            }
        }
    }
}

fn generate_castling_moves(position: &Position, from_sq: Square, piece: Piece, list: &mut Vec<Move>) {
    let us = piece.color();
    let back_rank = Rank::R1.relative_to_color(us);
    let king_origin = Square::new(File::E, back_rank);
    if from_sq != king_origin {
        return;
    }

    for side in CastlingSide::ALL {
        if !position.castling_availability().contains(CastlingRight::new(us, side)) {
            continue;
        }

        let (rook_origin, _) = side.rook_squares(us);
        if position[rook_origin] != Some(Piece::new(us, PieceType::Rook)) {
            continue;
        }

        // Every square strictly between the king and the rook must be empty.
        let direction = match side {
            CastlingSide::Kingside => Direction::East,
            CastlingSide::Queenside => Direction::West,
        };
        let path_is_clear = attacks::ray(king_origin, direction)
            .iter()
            .take_while(|sq| **sq != rook_origin)
            .all(|sq| position[*sq].is_none());
        if !path_is_clear {
            continue;
        }

        // The king may not start on, pass through or land on an attacked square.
        let king_destination = Square::new(side.king_destination_file(), back_rank);
        let transit = Square::new(side.rook_destination_file(), back_rank);
        if [king_origin, transit, king_destination].iter().any(|sq| attacks::is_attacked(position, *sq, !us)) {
            continue;
        }

        list.push(Move::new_castling(king_origin, king_destination, piece, side));
    }
}

/// Generates the pseudo-legal moves of the piece standing on `from_sq`.
///
/// Pseudo-legal moves follow the movement rules of each piece but may leave the mover's own king in check. Nothing is
/// generated if the square is empty or holds a piece of the side not to move.
///
/// # Parameters
/// * `position` - The position to generate moves for
/// * `from_sq` - The square of the piece to move
/// * `list` - The list the moves are appended to
pub fn generate_pseudo_legal_moves_from(position: &Position, from_sq: Square, list: &mut Vec<Move>) {
    let Some(piece) = position[from_sq] else {
        return;
    };
    if piece.color() != position.side_to_move() {
        return;
    }

    match piece.piece_type() {
        PieceType::Pawn => generate_pawn_moves(position, from_sq, piece, list),
        PieceType::Knight => {
            for to_sq in attacks::knight_targets(from_sq) {
                add_step(position, from_sq, *to_sq, piece, list);
            }
        }
        PieceType::Bishop => generate_slider_moves(position, from_sq, piece, &Direction::DIAGONAL, list),
        PieceType::Rook => generate_slider_moves(position, from_sq, piece, &Direction::ORTHOGONAL, list),
        PieceType::Queen => generate_slider_moves(position, from_sq, piece, &Direction::ALL, list),
        PieceType::King => {
            for to_sq in attacks::king_targets(from_sq) {
                add_step(position, from_sq, *to_sq, piece, list);
            }
            generate_castling_moves(position, from_sq, piece, list);
        }
    }
}

/// Generates the pseudo-legal moves of every piece of the side to move.
pub fn generate_pseudo_legal_moves(position: &Position, list: &mut Vec<Move>) {
    let us = position.side_to_move();
    for (square, _) in position.pieces().filter(|(_, piece)| piece.color() == us) {
        generate_pseudo_legal_moves_from(position, square, list);
    }
}
