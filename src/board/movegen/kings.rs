use super::super::attack_tables::king_attacks;
use super::super::{Board, Color, Move, MoveList, Piece, Square};
use super::GenKind;

#[inline]
fn home(rank: u8, file: u8) -> Square {
    Square::from_index(usize::from(rank * 8 + file))
}

impl Board {
    pub(super) fn generate_king_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        let targets = self.move_targets(kind);
        for from in self.pieces(us, Piece::King).iter() {
            self.push_piece_moves(from, Piece::King, king_attacks(from) & targets, moves);
        }
        if kind == GenKind::All {
            self.generate_castles(us, moves);
        }
    }

    /// Castle candidates. Each needs the right, empty squares between king
    /// and rook, and a king path (start, transit, destination) that the
    /// opponent does not attack.
    fn generate_castles(&self, us: Color, moves: &mut MoveList) {
        let rights = self.castling_rights();
        if !rights.has(us, true) && !rights.has(us, false) {
            return;
        }

        let rank = us.back_rank();
        let king_from = home(rank, 4);
        if self.piece_of(us, king_from) != Some(Piece::King) {
            return;
        }
        let them = us.opponent();
        let occupied = self.occupancy();
        let is_empty = |file: u8| !occupied.contains(home(rank, file));
        let is_safe = |file: u8| !self.is_square_attacked(home(rank, file), them);

        if rights.has(us, true)
            && self.piece_of(us, home(rank, 7)) == Some(Piece::Rook)
            && is_empty(5)
            && is_empty(6)
            && is_safe(4)
            && is_safe(5)
            && is_safe(6)
        {
            moves.push(Move::castle_kingside(king_from, home(rank, 6)));
        }

        if rights.has(us, false)
            && self.piece_of(us, home(rank, 0)) == Some(Piece::Rook)
            && is_empty(1)
            && is_empty(2)
            && is_empty(3)
            && is_safe(4)
            && is_safe(3)
            && is_safe(2)
        {
            moves.push(Move::castle_queenside(king_from, home(rank, 2)));
        }
    }
}
