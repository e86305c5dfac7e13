//! Position load/export in FEN and long-algebraic move decoding.
//!
//! Loading is strict about piece placement and side to move but lenient
//! about the trailing fields: unknown castling letters are skipped, an
//! unusable en passant square becomes "none", and unreadable clocks fall
//! back to their defaults.

use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{
    castle_bit, Bitboard, Board, CastlingRights, Color, Move, Piece, Square, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a board position from FEN notation.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 2 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        board.parse_placement(parts[0])?;

        board.state.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for color in Color::BOTH {
            let count = board.pieces(color, Piece::King).popcount();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
            board.check_material(color)?;
        }

        let waiting = board.side_to_move().opponent();
        if board.in_check(waiting) {
            return Err(FenError::OpponentInCheck { color: waiting });
        }

        let mut castling = 0u8;
        if let Some(field) = parts.get(2) {
            for c in field.chars() {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                castling |= castle_bit(color, c.to_ascii_uppercase());
            }
        }
        board.state.castling = CastlingRights::from_u8(castling);

        board.state.en_passant = parts
            .get(3)
            .and_then(|field| field.parse::<Square>().ok())
            .filter(|&sq| board.en_passant_is_plausible(sq));

        board.state.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.state.fullmove_number = parts
            .get(5)
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(1);

        board.state.hash = board.compute_hash();
        Ok(board)
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::BadRankLength {
                        rank: rank + 1,
                        files: file + 1,
                    });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                self.put_piece(Square::from_index(rank * 8 + file), color, piece);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadRankLength {
                    rank: rank + 1,
                    files: file,
                });
            }
        }
        Ok(())
    }

    /// Reject material no game can reach: pawns on the back ranks, more
    /// than 16 men, or more pawns and promoted pieces than 8 pawns allow.
    fn check_material(&self, color: Color) -> Result<(), FenError> {
        let pawns = self.pieces(color, Piece::Pawn);
        if let Some(square) = (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).lsb() {
            return Err(FenError::PawnOnBackRank { square });
        }

        let count = self.occupied_by(color).popcount();
        if count > 16 {
            return Err(FenError::TooManyPieces { color, count });
        }

        let promoted: u32 = [
            (Piece::Knight, 2),
            (Piece::Bishop, 2),
            (Piece::Rook, 2),
            (Piece::Queen, 1),
        ]
        .iter()
        .map(|&(piece, start)| self.pieces(color, piece).popcount().saturating_sub(start))
        .sum();
        if pawns.popcount() + promoted > 8 {
            return Err(FenError::ImpossibleMaterial {
                color,
                pawns: pawns.popcount(),
                promoted,
            });
        }
        Ok(())
    }

    /// An en passant target must sit behind an enemy pawn that just made a
    /// double step, on an empty square.
    fn en_passant_is_plausible(&self, sq: Square) -> bool {
        let us = self.side_to_move();
        let (target_rank, victim_offset) = match us {
            Color::White => (5, -1),
            Color::Black => (2, 1),
        };
        if sq.rank() != target_rank || self.occupancy().contains(sq) {
            return false;
        }
        sq.offset(victim_offset, 0).is_some_and(|victim| {
            self.pieces(us.opponent(), Piece::Pawn).contains(victim)
        })
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move() {
            Color::White => "w",
            Color::Black => "b",
        };
        let rights = self.castling_rights().as_u8();
        let mut castling: String = [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ]
        .iter()
        .filter(|(bit, _)| rights & bit != 0)
        .map(|&(_, c)| c)
        .collect();
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }

    /// Decode a move in long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// The special code (capture, en passant, double push, castle) is taken
    /// from the matching legal move in the current position.
    ///
    /// # Example
    /// ```
    /// use magic_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&notation.len()) || !notation.is_ascii() {
            return Err(MoveParseError::InvalidLength {
                len: notation.chars().count(),
            });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        };
        let from: Square = notation[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = notation[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match notation[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                    Some(piece)
                }
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        self.generate_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }

    /// Decode a move and make it on the board in one call.
    ///
    /// # Example
    /// ```
    /// use magic_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(notation)?;
        self.make_move(mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}
