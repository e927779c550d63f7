pub mod movegen;
pub mod position;
pub mod types;

pub use position::{Move, Position, STARTING_FEN};
pub use types::{CastleSide, CastlingRights, Color, Piece, PieceType, Square};
