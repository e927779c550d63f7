use std::fmt;

use crate::board::Position;
use crate::error::FenError;
use crate::notation::NominalMove;

/// Placeholder for missing header values
pub const UNKNOWN: &str = "Unknown";

/// The four standard result tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unfinished,
}

impl GameResult {
    pub fn from_token(token: &str) -> Option<GameResult> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Unfinished),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unfinished => "*",
        }
    }

    /// Decisive or drawn, i.e. counted in the tallies
    pub fn is_final(self) -> bool {
        self != GameResult::Unfinished
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A movetext token and the move it names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    pub text: String,
    pub nominal: NominalMove,
}

/// One parsed game: tag pairs, mainline moves and result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// 1-based position of the game in the record file
    pub number: usize,
    pub tags: Vec<(String, String)>,
    pub moves: Vec<RecordedMove>,
    /// `None` when the result is not one of the standard tokens
    pub result: Option<GameResult>,
    /// Result as written in the record, for display
    pub result_text: String,
}

impl Game {
    /// First value of the named tag
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn tag_or_unknown(&self, key: &str) -> &str {
        match self.tag(key) {
            Some(value) if !value.trim().is_empty() => value,
            _ => UNKNOWN,
        }
    }

    pub fn white(&self) -> &str {
        self.tag_or_unknown("White")
    }

    pub fn black(&self) -> &str {
        self.tag_or_unknown("Black")
    }

    pub fn date(&self) -> &str {
        self.tag_or_unknown("Date")
    }

    /// The `FEN` tag, if the game does not start from the standard arrangement
    pub fn fen(&self) -> Option<&str> {
        self.tag("FEN").filter(|fen| !fen.trim().is_empty())
    }

    pub fn starting_position(&self) -> Result<Position, FenError> {
        match self.fen() {
            Some(fen) => Position::from_fen(fen),
            None => Ok(Position::starting_position()),
        }
    }
}
