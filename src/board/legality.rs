//! Legality filtering and check detection.
//!
//! A pseudo-legal move is legal when, after applying it, the mover's king is
//! not attacked. Every candidate is tested by applying it, scanning attacks
//! on the king square and unmaking it; there is no pin or discovered-check
//! shortcut.

use super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::{Board, Color, Move, MoveList, Piece, Square};

impl Board {
    /// Whether any piece of color `by` attacks `sq` in the current position.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // A pawn of `by` attacks `sq` iff a pawn of the other color on `sq`
        // would attack it back.
        if !(pawn_attacks(by.opponent(), sq) & self.pieces(by, Piece::Pawn)).is_empty() {
            return true;
        }
        if !(knight_attacks(sq) & self.pieces(by, Piece::Knight)).is_empty() {
            return true;
        }
        if !(king_attacks(sq) & self.pieces(by, Piece::King)).is_empty() {
            return true;
        }

        let occupancy = self.occupancy();
        let queens = self.pieces(by, Piece::Queen);
        let rook_like = self.pieces(by, Piece::Rook) | queens;
        if !(rook_attacks(sq, occupancy) & rook_like).is_empty() {
            return true;
        }
        let bishop_like = self.pieces(by, Piece::Bishop) | queens;
        !(bishop_attacks(sq, occupancy) & bishop_like).is_empty()
    }

    /// Whether `color`'s king is attacked.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.in_check(self.side_to_move())
    }

    /// Whether a pseudo-legal move keeps the mover's king safe.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let mover = self.side_to_move();
        let after = self.apply(mv);
        !after.in_check(mover)
    }

    /// The exact legal move set for the side to move.
    pub fn generate_moves(&mut self) -> MoveList {
        let mut moves = self.generate_pseudo_moves();
        moves.retain(|mv| self.is_legal(mv));
        moves
    }

    /// Legal captures for the side to move (en passant and capturing
    /// promotions included).
    pub fn generate_captures(&mut self) -> MoveList {
        let mut moves = self.generate_pseudo_captures();
        moves.retain(|mv| self.is_legal(mv));
        moves
    }

    /// Whether the side to move has at least one legal move.
    pub fn has_legal_move(&mut self) -> bool {
        self.generate_pseudo_moves()
            .into_iter()
            .any(|mv| self.is_legal(mv))
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.is_check() && !self.has_legal_move()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_check() && !self.has_legal_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_position_move_count() {
        let mut board = Board::new();
        assert_eq!(board.generate_moves().len(), 20);
        assert!(board.generate_captures().is_empty());
        assert!(!board.is_check());
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        // Knight on e2 pinned against the king by the rook on e8
        let mut board = Board::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = board.generate_moves();
        assert!(moves.iter().all(|m| m.from() != sq("e2")));
    }

    #[test]
    fn test_square_attacked_by_each_piece_kind() {
        let board = Board::from_fen("4k3/8/8/3p4/8/5n2/8/R3K2B w - - 0 1").unwrap();
        assert!(board.is_square_attacked(sq("e4"), Color::Black)); // pawn d5
        assert!(board.is_square_attacked(sq("g1"), Color::Black)); // knight f3
        assert!(board.is_square_attacked(sq("a8"), Color::White)); // rook a1
        assert!(board.is_square_attacked(sq("f3"), Color::White)); // bishop h1
        assert!(!board.is_square_attacked(sq("a8"), Color::Black));
        assert!(!board.is_square_attacked(sq("e4"), Color::White)); // bishop blocked on f3
    }

    #[test]
    fn test_castling_through_check_is_excluded() {
        // Black rook on f8 covers f1, so only queenside castling is available
        let mut board = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = board.generate_moves();
        assert!(!moves.iter().any(|m| m.is_castle_kingside()));
        assert!(moves.iter().any(|m| m.is_castling() && !m.is_castle_kingside()));
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        let mut mate = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());

        let mut stale = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
    }

    #[test]
    fn test_legality_check_leaves_board_untouched() {
        let mut board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = board.clone();
        let _ = board.generate_moves();
        assert_eq!(board, before);
    }
}
