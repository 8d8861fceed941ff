use crate::{coordinates::Square, piece::PieceType, position::Position, r#move::Move};

use super::{
    attacks,
    generation::{generate_pseudo_legal_moves, generate_pseudo_legal_moves_from},
};

/// Determines if a pseudo-legal move is legal, that is if it does not leave the mover's king attacked.
///
/// The move is played on a clone of the position; `position` itself is never modified. A side without a king on the
/// board has nothing to protect, so all of its pseudo-legal moves are legal.
///
/// # Parameters
/// * `position` - The position the move is played from
/// * `mv` - A pseudo-legal move for the side to move
pub fn is_legal(position: &Position, mv: Move) -> bool {
    let us = position.side_to_move();
    let mut after = position.clone();
    after.make(mv);

    match after.king_square(us) {
        Some(king_sq) => !attacks::is_attacked(&after, king_sq, !us),
        None => true,
    }
}

/// Returns the legal moves of the piece standing on `square`.
pub fn legal_moves(position: &Position, square: Square) -> Vec<Move> {
    let mut list = Vec::new();
    generate_pseudo_legal_moves_from(position, square, &mut list);
    list.retain(|mv| is_legal(position, *mv));
    list
}

/// Returns every legal move of the side to move.
pub fn all_legal_moves(position: &Position) -> Vec<Move> {
    let mut list = Vec::new();
    generate_pseudo_legal_moves(position, &mut list);
    list.retain(|mv| is_legal(position, *mv));
    list
}

/// Returns true if the side to move has at least one legal move. Stops at the first one found.
pub fn has_legal_moves(position: &Position) -> bool {
    let us = position.side_to_move();
    let mut list = Vec::new();
    for (square, _) in position.pieces().filter(|(_, piece)| piece.color() == us) {
        list.clear();
        generate_pseudo_legal_moves_from(position, square, &mut list);
        if list.iter().any(|mv| is_legal(position, *mv)) {
            return true;
        }
    }
    false
}

/// Returns true if `mv` is one of the legal moves of the position.
pub fn is_legal_move(position: &Position, mv: Move) -> bool {
    legal_moves(position, mv.from_square()).contains(&mv)
}

/// Finds the legal move going from `from` to `to` with the requested promotion.
///
/// A pawn reaching the last rank must name its promotion, and any other move must not, so the promotion has to match
/// exactly for the move to be found.
///
/// # Returns
/// The matching move, or `None` if the request does not describe a legal move.
pub fn find_legal_move(position: &Position, from: Square, to: Square, promotion: Option<PieceType>) -> Option<Move> {
    legal_moves(position, from).into_iter().find(|mv| mv.to_square() == to && mv.promotion() == promotion)
}
