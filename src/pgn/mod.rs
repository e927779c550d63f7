pub mod game;
pub mod parser;

pub use game::{Game, GameResult, RecordedMove, UNKNOWN};
pub use parser::parse_games;
