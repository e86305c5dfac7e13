use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::{Bitboard, Board, MoveList, Piece, Square};
use super::GenKind;

impl Board {
    /// Moves for every bishop, rook or queen of the side to move.
    pub(super) fn generate_slider_moves(&self, piece: Piece, kind: GenKind, moves: &mut MoveList) {
        let attacks: fn(Square, Bitboard) -> Bitboard = match piece {
            Piece::Bishop => bishop_attacks,
            Piece::Rook => rook_attacks,
            Piece::Queen => queen_attacks,
            _ => return,
        };
        let occupancy = self.occupancy();
        let targets = self.move_targets(kind);
        for from in self.pieces(self.side_to_move(), piece).iter() {
            self.push_piece_moves(from, piece, attacks(from, occupancy) & targets, moves);
        }
    }
}
