//! PGN Match Report Library
//!
//! Reads multi-game PGN match records, replays every game against a
//! rules-aware board to produce canonical short-form notation, tallies
//! per-participant results and renders a self-contained HTML report.

pub mod board;
pub mod error;
pub mod notation;
pub mod pgn;
pub mod report;

pub use board::{Move, Position};
pub use error::{FenError, GameError, MoveError, ReportError};
pub use pgn::{parse_games, Game, GameResult};
pub use report::{default_output_path, Report, ReportGenerator, ReportSummary};
