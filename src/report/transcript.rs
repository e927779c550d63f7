use tracing::debug;

use crate::board::Color;
use crate::error::GameError;
use crate::notation::play;
use crate::pgn::{Game, GameResult};

/// One half-move of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub move_number: u16,
    pub color: Color,
    pub san: String,
}

/// A move-number row: the white and black half-moves sharing one number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRow<'a> {
    pub number: u16,
    pub white: Option<&'a str>,
    pub black: Option<&'a str>,
}

/// Replayed game with canonical notation for every move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub game_number: usize,
    pub white: String,
    pub black: String,
    pub date: String,
    pub result: Option<GameResult>,
    pub result_text: String,
    /// Starting position when the game does not begin from the standard arrangement
    pub fen: Option<String>,
    pub moves: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Replay the game's moves, producing notation for each.
    ///
    /// Stops at the first move that cannot be resolved; the whole game is
    /// then rejected.
    pub fn from_game(game: &Game) -> Result<Transcript, GameError> {
        let mut position = game
            .starting_position()
            .map_err(|e| GameError::MalformedRecord {
                game: game.number,
                reason: format!("invalid FEN tag: {}", e),
            })?;

        let mut moves = Vec::with_capacity(game.moves.len());
        for (i, recorded) in game.moves.iter().enumerate() {
            let move_number = position.full_moves;
            let color = position.to_move;
            let played = play(&position, &recorded.nominal).map_err(|source| {
                GameError::IllegalMoveReference {
                    game: game.number,
                    ply: i + 1,
                    token: recorded.text.clone(),
                    source,
                }
            })?;
            moves.push(TranscriptEntry {
                move_number,
                color,
                san: played.san,
            });
            position = played.position;
        }

        debug!(
            game = game.number,
            plies = moves.len(),
            final_fen = %position.to_fen(),
            "replayed game"
        );

        Ok(Transcript {
            game_number: game.number,
            white: game.white().to_string(),
            black: game.black().to_string(),
            date: game.date().to_string(),
            result: game.result,
            result_text: game.result_text.clone(),
            fen: game.fen().map(str::to_string),
            moves,
        })
    }

    /// Moves grouped by move number
    pub fn rows(&self) -> Vec<MoveRow<'_>> {
        let mut rows: Vec<MoveRow<'_>> = Vec::new();
        for entry in &self.moves {
            match entry.color {
                Color::White => rows.push(MoveRow {
                    number: entry.move_number,
                    white: Some(entry.san.as_str()),
                    black: None,
                }),
                Color::Black => match rows.last_mut() {
                    Some(row) if row.number == entry.move_number && row.black.is_none() => {
                        row.black = Some(entry.san.as_str());
                    }
                    _ => rows.push(MoveRow {
                        number: entry.move_number,
                        white: None,
                        black: Some(entry.san.as_str()),
                    }),
                },
            }
        }
        rows
    }

    /// Movetext such as `1. e4 e5 2. Nf3`, using `N...` when a row starts with black
    pub fn movetext(&self) -> String {
        let mut parts = Vec::new();
        for row in self.rows() {
            match (row.white, row.black) {
                (Some(white), Some(black)) => {
                    parts.push(format!("{}. {} {}", row.number, white, black))
                }
                (Some(white), None) => parts.push(format!("{}. {}", row.number, white)),
                (None, Some(black)) => parts.push(format!("{}... {}", row.number, black)),
                (None, None) => {}
            }
        }
        parts.join(" ")
    }

    /// Minimal PGN for pasting into an analysis board
    pub fn pgn(&self) -> String {
        let mut pgn = format!(
            "[White \"{}\"]\n[Black \"{}\"]\n",
            escape_tag(&self.white),
            escape_tag(&self.black)
        );
        if let Some(fen) = &self.fen {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", escape_tag(fen)));
        }
        pgn.push('\n');
        let movetext = self.movetext();
        if !movetext.is_empty() {
            pgn.push_str(&movetext);
            pgn.push(' ');
        }
        pgn.push_str(self.result.map_or("*", GameResult::as_token));
        pgn
    }

    /// Short description of the outcome, e.g. `Alice wins`
    pub fn summary(&self) -> String {
        match self.result {
            Some(GameResult::WhiteWins) => format!("{} wins", self.white),
            Some(GameResult::BlackWins) => format!("{} wins", self.black),
            Some(GameResult::Draw) => "Draw".to_string(),
            Some(GameResult::Unfinished) | None => "Unfinished".to_string(),
        }
    }
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::pgn::parse_games;

    fn transcript_of(text: &str) -> Result<Transcript, GameError> {
        let game = parse_games(text).remove(0).unwrap();
        Transcript::from_game(&game)
    }

    #[test]
    fn test_scholars_mate_transcript() {
        let transcript = transcript_of(
            "[White \"Alice\"]\n[Black \"Bob\"]\n[Date \"2024.05.01\"]\n[Result \"1-0\"]\n\n\
             1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7 1-0\n",
        )
        .unwrap();

        assert_eq!(transcript.moves.len(), 7);
        assert_eq!(transcript.moves[6].san, "Qxf7#");
        assert_eq!(transcript.movetext(), "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#");
        assert_eq!(transcript.summary(), "Alice wins");
        assert_eq!(transcript.date, "2024.05.01");
        assert_eq!(
            transcript.pgn(),
            "[White \"Alice\"]\n[Black \"Bob\"]\n\n1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0"
        );
    }

    #[test]
    fn test_rows_when_black_moves_first() {
        let transcript = transcript_of(
            "[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 30\"]\n\n30... Kd7 31. e4 Kc6 *\n",
        )
        .unwrap();

        let rows = transcript.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], MoveRow { number: 30, white: None, black: Some("Kd7") });
        assert_eq!(rows[1], MoveRow { number: 31, white: Some("e4"), black: Some("Kc6") });
        assert_eq!(transcript.movetext(), "30... Kd7 31. e4 Kc6");
        assert!(transcript
            .pgn()
            .contains("[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 30\"]"));
        assert_eq!(transcript.summary(), "Unfinished");
    }

    #[test]
    fn test_illegal_move_reports_ply_and_token() {
        let err = transcript_of("[White \"A\"]\n\n1. e4 e5 2. Ke3 *\n").unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalMoveReference {
                game: 1,
                ply: 3,
                token: "Ke3".to_string(),
                source: MoveError::NoLegalMatch,
            }
        );
    }

    #[test]
    fn test_invalid_fen_is_malformed() {
        let err = transcript_of("[FEN \"8/8/8 w - -\"]\n\n1. e4 *\n").unwrap_err();
        assert!(matches!(err, GameError::MalformedRecord { game: 1, .. }));
    }
}
