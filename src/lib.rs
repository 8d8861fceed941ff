pub mod config;
pub mod coordinates;
pub mod fen;
pub mod game;
pub mod history;
pub mod logging;
pub mod r#move;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod position;
pub mod status;

pub use coordinates::{File, Rank, Square};
pub use game::{Game, GameError, MoveResult};
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
pub use r#move::{CastlingRight, CastlingSide, Move, MoveType};
pub use status::{DrawReason, GameStatus, StatusReport};
