//! Short-form notation engine
//!
//! Resolves nominal moves against a position's legal moves and writes the
//! canonical short-form notation for a resolved move.

use tracing::trace;

use super::nominal::NominalMove;
use crate::board::{Move, PieceType, Position};
use crate::error::MoveError;

/// A resolved move together with its notation and the resulting position
#[derive(Debug, Clone)]
pub struct PlayedMove {
    pub chess_move: Move,
    pub san: String,
    pub position: Position,
}

/// Find the single legal move the nominal move refers to
pub fn resolve(position: &Position, nominal: &NominalMove) -> Result<Move, MoveError> {
    let legal = position.legal_moves();

    let candidates: Vec<&Move> = match nominal {
        NominalMove::Castle(side) => legal
            .iter()
            .filter(|mv| mv.castling == Some(*side))
            .collect(),
        NominalMove::Coordinate { from, to, promotion } => {
            match position.piece_at(*from) {
                Some(piece) if piece.color == position.to_move => {}
                _ => return Err(MoveError::NoPieceAtOrigin(*from)),
            }
            legal
                .iter()
                .filter(|mv| mv.from == *from && mv.to == *to && mv.promotion == *promotion)
                .collect()
        }
        NominalMove::Standard {
            piece_type,
            from_file,
            from_rank,
            to,
            promotion,
            ..
        } => legal
            .iter()
            .filter(|mv| {
                mv.castling.is_none()
                    && mv.piece.piece_type == *piece_type
                    && mv.to == *to
                    && mv.promotion == *promotion
                    && from_file.map_or(true, |file| mv.from.file() == file)
                    && from_rank.map_or(true, |rank| mv.from.rank() == rank)
                    // a pawn written without its file is a straight push
                    && (*piece_type != PieceType::Pawn
                        || from_file.is_some()
                        || mv.from.file() == mv.to.file())
            })
            .collect(),
    };

    match candidates.as_slice() {
        [single] => Ok((*single).clone()),
        [] => {
            trace!(
                nominal = %nominal,
                fen = %position.to_fen(),
                "no legal match\n{}",
                position.display_board()
            );
            Err(MoveError::NoLegalMatch)
        }
        many => Err(MoveError::Ambiguous(many.len())),
    }
}

/// Short-form notation of a legal move in `position`
pub fn to_san(position: &Position, chess_move: &Move) -> String {
    let next = position.apply(chess_move);
    let mut san = san_without_suffix(position, chess_move);
    if next.is_check() {
        if next.legal_moves().is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn san_without_suffix(position: &Position, chess_move: &Move) -> String {
    if let Some(side) = chess_move.castling {
        return side.token().to_string();
    }

    let mut san = String::new();
    let piece_type = chess_move.piece.piece_type;

    if piece_type == PieceType::Pawn {
        if chess_move.is_capture() {
            san.push(chess_move.from.file_char());
        }
    } else {
        san.push(piece_type.to_char());
        san.push_str(&disambiguation(position, chess_move));
    }

    if chess_move.is_capture() {
        san.push('x');
    }
    san.push_str(&chess_move.to.to_string());

    if let Some(promotion) = chess_move.promotion {
        san.push('=');
        san.push(promotion.to_char());
    }
    san
}

/// Origin file, rank or both, when another like piece can also reach the destination
fn disambiguation(position: &Position, chess_move: &Move) -> String {
    let rivals: Vec<Move> = position
        .legal_moves()
        .into_iter()
        .filter(|mv| {
            mv.piece == chess_move.piece && mv.to == chess_move.to && mv.from != chess_move.from
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|mv| mv.from.file() == chess_move.from.file());
    let shares_rank = rivals.iter().any(|mv| mv.from.rank() == chess_move.from.rank());

    if !shares_file {
        chess_move.from.file_char().to_string()
    } else if !shares_rank {
        chess_move.from.rank_char().to_string()
    } else {
        chess_move.from.to_string()
    }
}

/// Resolve a nominal move, name it, and advance the position
pub fn play(position: &Position, nominal: &NominalMove) -> Result<PlayedMove, MoveError> {
    let chess_move = resolve(position, nominal)?;
    let san = to_san(position, &chess_move);
    let next = position.apply(&chess_move);
    Ok(PlayedMove {
        chess_move,
        san,
        position: next,
    })
}
