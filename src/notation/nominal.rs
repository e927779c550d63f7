//! Move tokens as they appear in recorded movetext
//!
//! A nominal move only says what the record claims: a piece type, a
//! destination and whatever origin hints were written. It is turned into a
//! real move by matching it against the legal moves of a position.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::board::{CastleSide, PieceType, Square};
use crate::error::MoveError;

static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"^(?P<piece>[KQRBN])?(?P<file>[a-h])?(?P<rank>[1-8])?(?P<capture>[x:])?",
            r"(?P<dest>[a-h][1-8])(?:=?(?P<promo>[QRBNqrbn]))?$",
        ),
    )
    .expect("short-form move pattern is valid")
});

static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<from>[a-h][1-8])-?(?P<to>[a-h][1-8])(?P<promo>[qrbn])?$")
        .expect("coordinate move pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NominalMove {
    /// Short-form move such as `Nbd7`, `exd6` or `e8=Q`
    Standard {
        piece_type: PieceType,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<PieceType>,
    },
    Castle(CastleSide),
    /// Origin and destination squares, e.g. `e2e4` or `e7e8q`
    Coordinate {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },
}

impl NominalMove {
    /// Parse one movetext token. Check, mate and annotation suffixes are ignored.
    pub fn parse(token: &str) -> Result<NominalMove, MoveError> {
        let trimmed = token.trim_end_matches(['+', '#', '!', '?']);
        if trimmed.is_empty() {
            return Err(MoveError::InvalidToken);
        }

        match trimmed {
            "O-O" | "0-0" => return Ok(NominalMove::Castle(CastleSide::King)),
            "O-O-O" | "0-0-0" => return Ok(NominalMove::Castle(CastleSide::Queen)),
            _ => {}
        }

        if let Some(caps) = COORDINATE_RE.captures(trimmed) {
            let from = Square::from_algebraic(&caps["from"]).ok_or(MoveError::InvalidToken)?;
            let to = Square::from_algebraic(&caps["to"]).ok_or(MoveError::InvalidToken)?;
            let promotion = caps
                .name("promo")
                .and_then(|m| m.as_str().chars().next())
                .and_then(PieceType::from_char);
            return Ok(NominalMove::Coordinate { from, to, promotion });
        }

        let caps = SAN_RE.captures(trimmed).ok_or(MoveError::InvalidToken)?;
        let piece_type = caps
            .name("piece")
            .and_then(|m| m.as_str().chars().next())
            .and_then(PieceType::from_char)
            .unwrap_or(PieceType::Pawn);
        let from_file = caps.name("file").map(|m| m.as_str().as_bytes()[0] - b'a');
        let from_rank = caps.name("rank").map(|m| m.as_str().as_bytes()[0] - b'1');
        let to = Square::from_algebraic(&caps["dest"]).ok_or(MoveError::InvalidToken)?;
        let promotion = caps
            .name("promo")
            .and_then(|m| m.as_str().chars().next())
            .and_then(PieceType::from_char);

        if promotion.is_some() && piece_type != PieceType::Pawn {
            return Err(MoveError::InvalidToken);
        }
        if matches!(promotion, Some(PieceType::King) | Some(PieceType::Pawn)) {
            return Err(MoveError::InvalidToken);
        }

        Ok(NominalMove::Standard {
            piece_type,
            from_file,
            from_rank,
            capture: caps.name("capture").is_some(),
            to,
            promotion,
        })
    }
}

impl fmt::Display for NominalMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NominalMove::Castle(side) => write!(f, "{}", side.token()),
            NominalMove::Coordinate { from, to, promotion } => {
                write!(f, "{}{}", from, to)?;
                if let Some(promotion) = promotion {
                    write!(f, "{}", promotion.to_char().to_ascii_lowercase())?;
                }
                Ok(())
            }
            NominalMove::Standard {
                piece_type,
                from_file,
                from_rank,
                capture,
                to,
                promotion,
            } => {
                if *piece_type != PieceType::Pawn {
                    write!(f, "{}", piece_type.to_char())?;
                }
                if let Some(file) = from_file {
                    write!(f, "{}", (b'a' + file) as char)?;
                }
                if let Some(rank) = from_rank {
                    write!(f, "{}", (b'1' + rank) as char)?;
                }
                if *capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", to)?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.to_char())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_parse_piece_move_with_disambiguation() {
        let parsed = NominalMove::parse("Nbd7").unwrap();
        assert_eq!(
            parsed,
            NominalMove::Standard {
                piece_type: PieceType::Knight,
                from_file: Some(1),
                from_rank: None,
                capture: false,
                to: sq("d7"),
                promotion: None,
            }
        );
    }

    #[test]
    fn test_parse_pawn_capture_promotion_with_check() {
        let parsed = NominalMove::parse("exd8=Q+").unwrap();
        assert_eq!(
            parsed,
            NominalMove::Standard {
                piece_type: PieceType::Pawn,
                from_file: Some(4),
                from_rank: None,
                capture: true,
                to: sq("d8"),
                promotion: Some(PieceType::Queen),
            }
        );
        assert_eq!(NominalMove::parse("e8Q").unwrap(), NominalMove::parse("e8=Q").unwrap());
    }

    #[test]
    fn test_parse_castling_variants() {
        assert_eq!(NominalMove::parse("O-O").unwrap(), NominalMove::Castle(CastleSide::King));
        assert_eq!(NominalMove::parse("0-0-0+").unwrap(), NominalMove::Castle(CastleSide::Queen));
    }

    #[test]
    fn test_parse_coordinate_form() {
        assert_eq!(
            NominalMove::parse("e7e8q").unwrap(),
            NominalMove::Coordinate {
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(PieceType::Queen),
            }
        );
    }

    #[test]
    fn test_annotation_suffixes_are_ignored() {
        assert_eq!(NominalMove::parse("Qxf7#").unwrap().to_string(), "Qxf7");
        assert_eq!(NominalMove::parse("d4!?").unwrap().to_string(), "d4");
    }

    #[test]
    fn test_rejects_garbage() {
        for token in ["Zf3", "e9", "hello", "+", "Nf3=Q", "e8=K", ""] {
            assert_eq!(NominalMove::parse(token), Err(MoveError::InvalidToken), "{}", token);
        }
    }
}
