use once_cell::sync::Lazy;

use crate::{
    coordinates::Square,
    piece::{Color, Piece, PieceType},
    position::Position,
};

//======================================================================================================================
// Directions and target tables
//======================================================================================================================

/// One of the eight directions a sliding piece can travel in.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    pub const COUNT: usize = 8;

    /// The directions followed by rooks.
    pub const ORTHOGONAL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// The directions followed by bishops.
    pub const DIAGONAL: [Direction; 4] =
        [Direction::NorthEast, Direction::NorthWest, Direction::SouthEast, Direction::SouthWest];

    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Returns the (file, rank) step of the direction.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }

    /// Returns the sliding piece type, other than the queen, that moves along this direction.
    pub fn slider(self) -> PieceType {
        if Direction::ORTHOGONAL.contains(&self) {
            PieceType::Rook
        } else {
            PieceType::Bishop
        }
    }
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];

fn leaper_targets(deltas: &[(i8, i8)]) -> [Vec<Square>; Square::COUNT] {
    std::array::from_fn(|index| {
        let square = Square::ALL[index];
        deltas.iter().filter_map(|(file_delta, rank_delta)| square.offset(*file_delta, *rank_delta)).collect()
    })
}

static KNIGHT_TARGETS: Lazy<[Vec<Square>; Square::COUNT]> = Lazy::new(|| leaper_targets(&KNIGHT_DELTAS));

static KING_TARGETS: Lazy<[Vec<Square>; Square::COUNT]> = Lazy::new(|| {
    let deltas: Vec<(i8, i8)> = Direction::ALL.iter().map(|direction| direction.delta()).collect();
    leaper_targets(&deltas)
});

/// For every square and direction, the squares reached by walking to the edge of the board, nearest first.
static RAYS: Lazy<[[Vec<Square>; Direction::COUNT]; Square::COUNT]> = Lazy::new(|| {
    std::array::from_fn(|index| {
        std::array::from_fn(|direction_index| {
            let (file_delta, rank_delta) = Direction::ALL[direction_index].delta();
            let mut ray = Vec::with_capacity(7);
            let mut current = Square::ALL[index];
            while let Some(next) = current.offset(file_delta, rank_delta) {
                ray.push(next);
                current = next;
            }
            ray
        })
    })
});

/// Returns the squares a knight standing on `square` can jump to.
pub fn knight_targets(square: Square) -> &'static [Square] {
    &KNIGHT_TARGETS[usize::from(square)]
}

/// Returns the squares adjacent to `square`.
pub fn king_targets(square: Square) -> &'static [Square] {
    &KING_TARGETS[usize::from(square)]
}

/// Returns the squares from `square` to the edge of the board in `direction`, nearest first.
pub fn ray(square: Square, direction: Direction) -> &'static [Square] {
    &RAYS[usize::from(square)][direction as usize]
}

/// Returns the first occupied square along a ray, with the piece standing on it.
pub fn first_blocker(position: &Position, square: Square, direction: Direction) -> Option<(Square, Piece)> {
    ray(square, direction).iter().find_map(|sq| position[*sq].map(|piece| (*sq, piece)))
}

//======================================================================================================================
// Attack detection
//======================================================================================================================

/// Returns the squares a pawn of `color` must stand on to attack `square`.
fn pawn_attacker_squares(square: Square, color: Color) -> impl Iterator<Item = Square> {
    [-1, 1].into_iter().filter_map(move |file_delta| square.offset(file_delta, -color.forward()))
}

/// Calls `visit` with the square of every piece of color `by` that attacks `square`, stopping as soon as `visit`
/// returns true.
///
/// # Returns
/// True if `visit` stopped the walk.
fn visit_attackers(position: &Position, square: Square, by: Color, mut visit: impl FnMut(Square) -> bool) -> bool {
    let pawn = Piece::new(by, PieceType::Pawn);
    for sq in pawn_attacker_squares(square, by) {
        if position[sq] == Some(pawn) && visit(sq) {
            return true;
        }
    }

    let knight = Piece::new(by, PieceType::Knight);
    for sq in knight_targets(square) {
        if position[*sq] == Some(knight) && visit(*sq) {
            return true;
        }
    }

    let queen = Piece::new(by, PieceType::Queen);
    for direction in Direction::ALL {
        if let Some((sq, piece)) = first_blocker(position, square, direction) {
            if (piece == queen || piece == Piece::new(by, direction.slider())) && visit(sq) {
                return true;
            }
        }
    }

    let king = Piece::new(by, PieceType::King);
    for sq in king_targets(square) {
        if position[*sq] == Some(king) && visit(*sq) {
            return true;
        }
    }

    false
}

/// Determines whether a square is attacked by any piece of a specific color.
///
/// The square does not need to be occupied. Pieces of color `by` standing on the square itself are ignored.
///
/// # Parameters
/// * `position` - The position to inspect
/// * `square` - The target square being checked for attacks
/// * `by` - The color of the attacking pieces
///
/// # Returns
/// `true` if any piece of the specified color attacks the target square.
pub fn is_attacked(position: &Position, square: Square, by: Color) -> bool {
    visit_attackers(position, square, by, |_| true)
}

/// Returns the squares of every piece of color `by` attacking `square`.
pub fn attackers(position: &Position, square: Square, by: Color) -> Vec<Square> {
    let mut result = Vec::new();
    visit_attackers(position, square, by, |sq| {
        result.push(sq);
        false
    });
    result
}
