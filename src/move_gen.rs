pub mod attacks;
pub mod generation;
pub mod legality;

pub use attacks::{attackers, is_attacked};
pub use generation::{generate_pseudo_legal_moves, generate_pseudo_legal_moves_from};
pub use legality::{all_legal_moves, find_legal_move, has_legal_moves, is_legal, is_legal_move, legal_moves};
