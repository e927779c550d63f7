//! Legal move generation
//!
//! Moves are first generated by movement rules alone, then filtered by
//! applying each one and rejecting those that leave the mover's king attacked.

use super::position::{
    Move, Position, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use super::types::{CastleSide, Color, Piece, PieceType, Square};

impl Position {
    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        let mover = self.to_move;
        let mut moves: Vec<Move> = self
            .pseudo_legal_moves()
            .into_iter()
            .filter(|mv| !self.apply(mv).is_king_in_check(mover))
            .collect();
        moves.extend(self.castling_moves());
        moves
    }

    /// Legal moves of the piece standing on `square`
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == square)
            .collect()
    }

    /// Legal destination squares of the piece standing on `square`
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> =
            self.legal_moves_from(square).iter().map(|mv| mv.to).collect();
        destinations.dedup();
        destinations
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        let pieces: Vec<(Square, Piece)> = self.pieces(self.to_move).collect();
        for (from, piece) in pieces {
            match piece.piece_type {
                PieceType::Pawn => self.pawn_moves(from, piece, &mut moves),
                PieceType::Knight => self.step_moves(from, piece, &KNIGHT_OFFSETS, &mut moves),
                PieceType::King => self.step_moves(from, piece, &KING_OFFSETS, &mut moves),
                PieceType::Bishop => self.slide_moves(from, piece, &BISHOP_DIRECTIONS, &mut moves),
                PieceType::Rook => self.slide_moves(from, piece, &ROOK_DIRECTIONS, &mut moves),
                PieceType::Queen => {
                    self.slide_moves(from, piece, &ROOK_DIRECTIONS, &mut moves);
                    self.slide_moves(from, piece, &BISHOP_DIRECTIONS, &mut moves);
                }
            }
        }
        moves
    }

    /// Move or capture onto `to`, unless it holds a friendly piece
    fn target(&self, from: Square, to: Square, piece: Piece) -> Option<Move> {
        match self.piece_at(to) {
            Some(occupant) if occupant.color == piece.color => None,
            occupant => {
                let mut mv = Move::new(from, to, piece);
                mv.captured = occupant;
                Some(mv)
            }
        }
    }

    fn step_moves(&self, from: Square, piece: Piece, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(df, dr) in offsets {
            if let Some(mv) = from.offset(df, dr).and_then(|to| self.target(from, to, piece)) {
                moves.push(mv);
            }
        }
    }

    fn slide_moves(
        &self,
        from: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions {
            let mut current = from.offset(df, dr);
            while let Some(to) = current {
                match self.target(from, to, piece) {
                    Some(mv) => {
                        let blocked = mv.is_capture();
                        moves.push(mv);
                        if blocked {
                            break;
                        }
                    }
                    None => break,
                }
                current = to.offset(df, dr);
            }
        }
    }

    fn pawn_moves(&self, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let direction = piece.color.pawn_direction();
        let start_rank = match piece.color {
            Color::White => 1,
            Color::Black => 6,
        };

        if let Some(one) = from.offset(0, direction) {
            if !self.is_occupied(one) {
                push_pawn_move(Move::new(from, one, piece), moves);
                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * direction) {
                        if !self.is_occupied(two) {
                            moves.push(Move::new(from, two, piece));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(to) = from.offset(df, direction) else {
                continue;
            };
            match self.piece_at(to) {
                Some(occupant) if occupant.color != piece.color => {
                    let mut mv = Move::new(from, to, piece);
                    mv.captured = Some(occupant);
                    push_pawn_move(mv, moves);
                }
                None if self.en_passant_target == Some(to) => {
                    let victim_square = Square::new(to.file(), from.rank());
                    let victim = victim_square.and_then(|sq| self.piece_at(sq));
                    if victim == Some(Piece::new(PieceType::Pawn, piece.color.opposite())) {
                        let mut mv = Move::new(from, to, piece);
                        mv.captured = victim;
                        mv.is_en_passant = true;
                        moves.push(mv);
                    }
                }
                _ => {}
            }
        }
    }

    /// Castling moves that are legal right now: right held, rook in its corner,
    /// transit squares empty, and the king neither in, through nor into check.
    fn castling_moves(&self) -> Vec<Move> {
        let color = self.to_move;
        let rank = color.back_rank();
        let king = Piece::new(PieceType::King, color);
        let rook = Piece::new(PieceType::Rook, color);
        let enemy = color.opposite();

        let mut moves = Vec::new();
        let Some(king_square) = Square::new(4, rank) else {
            return moves;
        };
        if self.piece_at(king_square) != Some(king) || self.is_square_attacked(king_square, enemy) {
            return moves;
        }

        for side in [CastleSide::King, CastleSide::Queen] {
            if !self.castling_rights.can_castle(color, side) {
                continue;
            }
            let (rook_file, _) = side.rook_files();
            if Square::new(rook_file, rank).and_then(|sq| self.piece_at(sq)) != Some(rook) {
                continue;
            }

            let (empty_files, king_path): (&[u8], &[u8]) = match side {
                CastleSide::King => (&[5, 6], &[5, 6]),
                CastleSide::Queen => (&[1, 2, 3], &[3, 2]),
            };
            let clear = empty_files
                .iter()
                .all(|&file| Square::new(file, rank).map_or(false, |sq| !self.is_occupied(sq)));
            let safe = king_path.iter().all(|&file| {
                Square::new(file, rank).map_or(false, |sq| !self.is_square_attacked(sq, enemy))
            });
            if !clear || !safe {
                continue;
            }

            if let Some(to) = Square::new(side.king_to_file(), rank) {
                let mut mv = Move::new(king_square, to, king);
                mv.castling = Some(side);
                moves.push(mv);
            }
        }
        moves
    }
}

fn push_pawn_move(mv: Move, moves: &mut Vec<Move>) {
    let last_rank = match mv.piece.color {
        Color::White => 7,
        Color::Black => 0,
    };
    if mv.to.rank() == last_rank {
        for promotion in PieceType::PROMOTIONS {
            let mut promoted = mv.clone();
            promoted.promotion = Some(promotion);
            moves.push(promoted);
        }
    } else {
        moves.push(mv);
    }
}
