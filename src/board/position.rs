//! Chess position tracking
//!
//! A `Position` holds everything needed to decide move legality: piece
//! placement, side to move, castling rights and the en passant target.
//! Positions are advanced with `apply`, which returns the successor and
//! leaves the original untouched.
use std::fmt::Write;

use super::types::{CastleSide, CastlingRights, Color, Piece, PieceType, Square};
use crate::error::FenError;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// A fully qualified move, only meaningful for the position it was generated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub castling: Option<CastleSide>,
    pub is_en_passant: bool,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            castling: None,
            is_en_passant: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    pub to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    /// Half-move clock for the 50-move rule
    pub half_moves: u16,
    pub full_moves: u16,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Position {
    fn empty() -> Self {
        Position {
            board: [None; 64],
            to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            half_moves: 0,
            full_moves: 1,
        }
    }

    /// Standard starting arrangement
    pub fn starting_position() -> Self {
        let mut position = Self::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for color in [Color::White, Color::Black] {
            let pawn_rank = match color {
                Color::White => 1,
                Color::Black => 6,
            };
            for (file, piece_type) in back_rank.iter().enumerate() {
                if let Some(square) = Square::new(file as u8, color.back_rank()) {
                    position.place_piece(square, Piece::new(*piece_type, color));
                }
                if let Some(square) = Square::new(file as u8, pawn_rank) {
                    position.place_piece(square, Piece::new(PieceType::Pawn, color));
                }
            }
        }
        position.castling_rights = CastlingRights::all();
        position
    }

    /// Parse a FEN string. The two move counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut position = Self::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(fields[0].to_string()));
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::Placement(fields[0].to_string()));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or_else(|| FenError::Placement(fields[0].to_string()))?;
                    let square = Square::new(file, rank)
                        .ok_or_else(|| FenError::Placement(fields[0].to_string()))?;
                    position.place_piece(square, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::Placement(fields[0].to_string()));
                }
            }
            if file != 8 {
                return Err(FenError::Placement(fields[0].to_string()));
            }
        }

        position.to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => position.castling_rights.white_kingside = true,
                    'Q' => position.castling_rights.white_queenside = true,
                    'k' => position.castling_rights.black_kingside = true,
                    'q' => position.castling_rights.black_queenside = true,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                }
            }
        }

        position.en_passant_target = match fields[3] {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .ok_or_else(|| FenError::EnPassant(text.to_string()))?,
            ),
        };

        if let Some(text) = fields.get(4) {
            position.half_moves = text
                .parse()
                .map_err(|_| FenError::Counter(text.to_string()))?;
        }
        if let Some(text) = fields.get(5) {
            position.full_moves = text
                .parse()
                .map_err(|_| FenError::Counter(text.to_string()))?;
        }

        for color in [Color::White, Color::Black] {
            let kings = Square::all()
                .filter(|&sq| {
                    position.piece_at(sq) == Some(Piece::new(PieceType::King, color))
                })
                .count();
            if kings != 1 {
                return Err(FenError::Kings);
            }
        }

        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            let _ = write!(fen, "{}", empty);
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{}", empty);
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        let side = match self.to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant_target
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            fen,
            " {} {} {} {} {}",
            side, self.castling_rights, en_passant, self.half_moves, self.full_moves
        );
        fen
    }

    fn place_piece(&mut self, square: Square, piece: Piece) {
        self.board[square.index()] = Some(piece);
    }

    fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.board[square.index()].take()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.index()]
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Squares holding pieces of `color`, in a1..h8 order
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king_square) => self.is_square_attacked(king_square, color.opposite()),
            None => false,
        }
    }

    /// Whether the side to move is in check
    pub fn is_check(&self) -> bool {
        self.is_king_in_check(self.to_move)
    }

    /// Whether any piece of `by_color` attacks `square`
    pub fn is_square_attacked(&self, square: Square, by_color: Color) -> bool {
        let holds = |sq: Option<Square>, types: &[PieceType]| -> bool {
            match sq.and_then(|sq| self.piece_at(sq)) {
                Some(piece) => piece.color == by_color && types.contains(&piece.piece_type),
                None => false,
            }
        };

        // A pawn attacks diagonally forward, so look one rank behind the target
        let behind = -by_color.pawn_direction();
        if holds(square.offset(-1, behind), &[PieceType::Pawn])
            || holds(square.offset(1, behind), &[PieceType::Pawn])
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), &[PieceType::Knight]))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), &[PieceType::King]))
        {
            return true;
        }

        let sliders = [
            (ROOK_DIRECTIONS, [PieceType::Rook, PieceType::Queen]),
            (BISHOP_DIRECTIONS, [PieceType::Bishop, PieceType::Queen]),
        ];
        for (directions, types) in sliders.iter() {
            for &(df, dr) in directions.iter() {
                let mut current = square.offset(df, dr);
                while let Some(sq) = current {
                    if let Some(piece) = self.piece_at(sq) {
                        if piece.color == by_color && types.contains(&piece.piece_type) {
                            return true;
                        }
                        break;
                    }
                    current = sq.offset(df, dr);
                }
            }
        }

        false
    }

    /// Successor position after `chess_move`.
    ///
    /// The move must come from this position's legal move list; anything else
    /// is a caller bug.
    pub fn apply(&self, chess_move: &Move) -> Position {
        let mut next = self.clone();
        next.apply_move(chess_move);
        next
    }

    fn apply_move(&mut self, chess_move: &Move) {
        debug_assert_eq!(self.piece_at(chess_move.from), Some(chess_move.piece));
        debug_assert_eq!(chess_move.piece.color, self.to_move);

        let color = chess_move.piece.color;
        self.remove_piece(chess_move.from);

        if chess_move.is_en_passant {
            let captured_square = Square::new(chess_move.to.file(), chess_move.from.rank());
            if let Some(captured_square) = captured_square {
                self.remove_piece(captured_square);
            }
        }

        let placed = match chess_move.promotion {
            Some(promotion) => Piece::new(promotion, color),
            None => chess_move.piece,
        };
        self.place_piece(chess_move.to, placed);

        if let Some(side) = chess_move.castling {
            let (rook_from, rook_to) = side.rook_files();
            let rank = color.back_rank();
            let rook_squares = (Square::new(rook_from, rank), Square::new(rook_to, rank));
            if let (Some(from), Some(to)) = rook_squares {
                if let Some(rook) = self.remove_piece(from) {
                    self.place_piece(to, rook);
                }
            }
        }

        if chess_move.piece.piece_type == PieceType::King {
            self.castling_rights.disable_castling(color, None);
        }
        // Covers a rook leaving its corner and a rook captured on its corner
        self.castling_rights.disable_for_rook_square(chess_move.from);
        self.castling_rights.disable_for_rook_square(chess_move.to);

        self.en_passant_target = None;
        if chess_move.piece.piece_type == PieceType::Pawn {
            let rank_diff = chess_move.to.rank() as i8 - chess_move.from.rank() as i8;
            if rank_diff.abs() == 2 {
                let target_rank = (chess_move.from.rank() + chess_move.to.rank()) / 2;
                self.en_passant_target = Square::new(chess_move.from.file(), target_rank);
            }
        }

        if chess_move.piece.piece_type == PieceType::Pawn || chess_move.is_capture() {
            self.half_moves = 0;
        } else {
            self.half_moves = self.half_moves.saturating_add(1);
        }
        if color == Color::Black {
            self.full_moves = self.full_moves.saturating_add(1);
        }

        self.to_move = color.opposite();
    }

    /// Text diagram of the board, white at the bottom
    pub fn display_board(&self) -> String {
        let mut result = String::new();
        result.push_str("  a b c d e f g h\n");
        for rank in (0..8u8).rev() {
            let _ = write!(result, "{} ", rank + 1);
            for file in 0..8u8 {
                let symbol = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map(|piece| piece.to_fen_char())
                    .unwrap_or('.');
                let _ = write!(result, "{} ", symbol);
            }
            let _ = writeln!(result, " {}", rank + 1);
        }
        result.push_str("  a b c d e f g h\n");
        result
    }
}
