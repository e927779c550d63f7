//! Error types for the report pipeline
//!
//! Errors come in two scopes. `GameError` is confined to a single game: the
//! game is skipped and the batch continues. `ReportError` aborts the batch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::board::Square;

/// Invalid FEN string in a `FEN` tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid side to move: {0}")]
    SideToMove(String),

    #[error("invalid castling field: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid move counter: {0}")]
    Counter(String),

    #[error("each side needs exactly one king")]
    Kings,
}

/// A nominal move that cannot be turned into exactly one legal move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("unrecognized move token")]
    InvalidToken,

    #[error("no piece of the side to move on {0}")]
    NoPieceAtOrigin(Square),

    #[error("no legal move matches")]
    NoLegalMatch,

    #[error("{0} legal moves match")]
    Ambiguous(usize),
}

/// Failure scoped to one game of the record file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game {game}: malformed record: {reason}")]
    MalformedRecord { game: usize, reason: String },

    #[error("game {game}: illegal move reference '{token}' at ply {ply}: {source}")]
    IllegalMoveReference {
        game: usize,
        ply: usize,
        token: String,
        #[source]
        source: MoveError,
    },
}

impl GameError {
    /// Number of the game (1-based position in the input file)
    pub fn game(&self) -> usize {
        match self {
            GameError::MalformedRecord { game, .. } => *game,
            GameError::IllegalMoveReference { game, .. } => *game,
        }
    }
}

/// Fatal batch failure
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output file '{0}' already exists, use --force to overwrite")]
    OutputExists(PathBuf),
}
