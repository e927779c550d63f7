//! Match record parser
//!
//! Splits a multi-game record file into game blocks, reads the tag pairs of
//! each block and tokenizes its movetext into nominal moves. Problems are
//! scoped to the game they occur in; the remaining games still parse.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::game::{Game, GameResult, RecordedMove, UNKNOWN};
use crate::error::GameError;
use crate::notation::NominalMove;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[\s*([A-Za-z0-9_]+)\s+"((?:[^"\\]|\\.)*)"\s*\]$"#)
        .expect("tag pair pattern is valid")
});

static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*\.+(?P<rest>.*)$|^\d+$").expect("move number pattern is valid")
});

/// Lines of one game block before interpretation
#[derive(Debug, Default)]
struct RawGame {
    tag_lines: Vec<String>,
    movetext: String,
}

impl RawGame {
    fn is_empty(&self) -> bool {
        self.tag_lines.is_empty() && self.movetext.trim().is_empty()
    }

    fn ends_with_result(&self) -> bool {
        match strip_commentary(&self.movetext) {
            Ok(text) => text
                .split_whitespace()
                .last()
                .map_or(false, |token| GameResult::from_token(token).is_some()),
            Err(_) => false,
        }
    }
}

/// Parse every game in the record text, in file order
pub fn parse_games(text: &str) -> Vec<Result<Game, GameError>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    split_games(text)
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_game(i + 1, &raw))
        .collect()
}

fn split_games(text: &str) -> Vec<RawGame> {
    let mut games = Vec::new();
    let mut current = RawGame::default();
    let mut in_comment = false;
    let mut blank_since_tags = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if in_comment {
            current.movetext.push_str(line);
            current.movetext.push('\n');
            in_comment = comment_open_after(line, true);
            continue;
        }

        if trimmed.starts_with('%') {
            continue;
        }

        if trimmed.is_empty() {
            if current.ends_with_result() {
                games.push(std::mem::take(&mut current));
                blank_since_tags = false;
            } else if !current.tag_lines.is_empty() {
                blank_since_tags = true;
            }
            continue;
        }

        if trimmed.starts_with('[') {
            let starts_new_game = !current.movetext.trim().is_empty()
                || (blank_since_tags && !current.tag_lines.is_empty());
            if starts_new_game {
                games.push(std::mem::take(&mut current));
            }
            blank_since_tags = false;
            current.tag_lines.push(trimmed.to_string());
            continue;
        }

        current.movetext.push_str(line);
        current.movetext.push('\n');
        in_comment = comment_open_after(line, false);
    }

    if !current.is_empty() {
        games.push(current);
    }
    games
}

/// Whether a brace comment is still open at the end of `line`
fn comment_open_after(line: &str, mut open: bool) -> bool {
    for c in line.chars() {
        match c {
            '{' if !open => open = true,
            '}' if open => open = false,
            ';' if !open => break,
            _ => {}
        }
    }
    open
}

/// Remove comments, variations and numeric annotation glyphs from movetext
fn strip_commentary(movetext: &str) -> Result<String, String> {
    let mut out = String::with_capacity(movetext.len());
    let mut chars = movetext.chars().peekable();
    let mut variation_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err("unterminated comment".to_string());
                }
                out.push(' ');
            }
            ';' => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
                out.push(' ');
            }
            '(' => {
                variation_depth += 1;
                out.push(' ');
            }
            ')' => {
                if variation_depth == 0 {
                    return Err("unbalanced ')'".to_string());
                }
                variation_depth -= 1;
                out.push(' ');
            }
            '}' => return Err("unbalanced '}'".to_string()),
            '$' => {
                while chars.peek().map_or(false, |d| d.is_ascii_digit()) {
                    chars.next();
                }
                out.push(' ');
            }
            _ if variation_depth > 0 => {}
            _ => out.push(c),
        }
    }

    if variation_depth > 0 {
        return Err("unterminated variation".to_string());
    }
    Ok(out)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_game(number: usize, raw: &RawGame) -> Result<Game, GameError> {
    let malformed = |reason: String| GameError::MalformedRecord { game: number, reason };

    let mut tags = Vec::with_capacity(raw.tag_lines.len());
    for line in &raw.tag_lines {
        let caps = TAG_RE
            .captures(line)
            .ok_or_else(|| malformed(format!("unparseable tag pair: {}", line)))?;
        tags.push((caps[1].to_string(), unescape(&caps[2])));
    }

    let movetext = strip_commentary(&raw.movetext).map_err(malformed)?;

    let mut moves = Vec::new();
    let mut terminator: Option<GameResult> = None;
    for token in movetext.split_whitespace() {
        if let Some(result) = terminator {
            return Err(malformed(format!(
                "unexpected token '{}' after result {}",
                token, result
            )));
        }

        let token = match MOVE_NUMBER_RE.captures(token) {
            Some(caps) => match caps.name("rest").map(|m| m.as_str()) {
                Some(rest) if !rest.is_empty() => rest,
                _ => continue,
            },
            None => token,
        };

        if let Some(result) = GameResult::from_token(token) {
            terminator = Some(result);
            continue;
        }

        let nominal = NominalMove::parse(token)
            .map_err(|_| malformed(format!("unrecognized move token '{}'", token)))?;
        moves.push(RecordedMove {
            text: token.to_string(),
            nominal,
        });
    }

    let header_result = tags
        .iter()
        .find(|(k, _)| k == "Result")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let (result, result_text) = match (header_result, terminator) {
        (Some(text), terminator) => match GameResult::from_token(&text) {
            Some(result) => (Some(result), text),
            None => match terminator {
                Some(result) => (Some(result), result.as_token().to_string()),
                None => (None, text),
            },
        },
        (None, Some(result)) => (Some(result), result.as_token().to_string()),
        (None, None) => (None, UNKNOWN.to_string()),
    };

    debug!(game = number, moves = moves.len(), result = %result_text, "parsed game");

    Ok(Game {
        number,
        tags,
        moves,
        result,
        result_text,
    })
}
