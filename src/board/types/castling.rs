//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Castling rights as a 4-bit set: white kingside, white queenside,
/// black kingside, black queenside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle kingside and queenside)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Remove a specific castling right
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    /// Raw bitmask value, 0-15 (indexes the castling hash keys)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & ALL_CASTLING_RIGHTS)
    }

    /// Rights that survive a move touching the squares in `touched`.
    ///
    /// Any move that starts or ends on a king or rook home square clears the
    /// rights tied to that square; this covers king moves, rook moves and
    /// captures of an unmoved rook.
    #[inline]
    #[must_use]
    pub fn after_touching(self, touched: Bitboard) -> Self {
        let mut bits = self.0;
        for &(mask, lost) in RIGHTS_BY_SQUARE.iter() {
            if touched.0 & mask != 0 {
                bits &= !lost;
            }
        }
        CastlingRights(bits)
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

const fn sq_bit(sq: Square) -> u64 {
    1u64 << sq.index()
}

/// Home squares and the rights lost when they are touched
const RIGHTS_BY_SQUARE: [(u64, u8); 6] = [
    (sq_bit(Square::E1), CASTLE_WHITE_K | CASTLE_WHITE_Q),
    (sq_bit(Square::H1), CASTLE_WHITE_K),
    (sq_bit(Square::A1), CASTLE_WHITE_Q),
    (sq_bit(Square::E8), CASTLE_BLACK_K | CASTLE_BLACK_Q),
    (sq_bit(Square::H8), CASTLE_BLACK_K),
    (sq_bit(Square::A8), CASTLE_BLACK_Q),
];

pub(crate) fn castle_bit(color: Color, side: char) -> u8 {
    match (color, side) {
        (Color::White, 'K') => CASTLE_WHITE_K,
        (Color::White, 'Q') => CASTLE_WHITE_Q,
        (Color::Black, 'K') => CASTLE_BLACK_K,
        (Color::Black, 'Q') => CASTLE_BLACK_Q,
        _ => 0,
    }
}
