//! Precomputed attack tables for leaper pieces (knights, kings, pawns).

use crate::board::types::{Bitboard, Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    for (idx, slot) in attacks.iter_mut().enumerate() {
        let sq = Square::from_index(idx);
        for &(dr, df) in deltas {
            if let Some(target) = sq.offset(dr, df) {
                *slot |= Bitboard::from_square(target);
            }
        }
    }
    attacks
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    leaper_table(&KNIGHT_DELTAS)
}

pub(super) fn king_table() -> [Bitboard; 64] {
    leaper_table(&KING_DELTAS)
}

/// Squares attacked by a pawn of each color, indexed `[color][square]`
pub(super) fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::BOTH {
        let forward = match color {
            Color::White => 1,
            Color::Black => -1,
        };
        attacks[color.index()] = leaper_table(&[(forward, -1), (forward, 1)]);
    }
    attacks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_knight_counts() {
        let table = knight_table();
        assert_eq!(table[sq("a1").index()].popcount(), 2);
        assert_eq!(table[sq("b1").index()].popcount(), 3);
        assert_eq!(table[sq("e4").index()].popcount(), 8);
    }

    #[test]
    fn test_king_counts() {
        let table = king_table();
        assert_eq!(table[sq("h8").index()].popcount(), 3);
        assert_eq!(table[sq("e1").index()].popcount(), 5);
        assert_eq!(table[sq("d5").index()].popcount(), 8);
    }

    #[test]
    fn test_pawn_attacks_by_color() {
        let table = pawn_table();
        let white = table[Color::White.index()][sq("e4").index()];
        let black = table[Color::Black.index()][sq("e4").index()];
        assert_eq!(white, Bitboard::from_square(sq("d5")) | Bitboard::from_square(sq("f5")));
        assert_eq!(black, Bitboard::from_square(sq("d3")) | Bitboard::from_square(sq("f3")));
        assert_eq!(
            table[Color::White.index()][sq("a2").index()],
            Bitboard::from_square(sq("b3"))
        );
        assert!(table[Color::White.index()][sq("c8").index()].is_empty());
    }
}
