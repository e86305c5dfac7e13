use super::super::attack_tables::knight_attacks;
use super::super::{Board, MoveList, Piece};
use super::GenKind;

impl Board {
    pub(super) fn generate_knight_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let targets = self.move_targets(kind);
        for from in self.pieces(self.side_to_move(), Piece::Knight).iter() {
            self.push_piece_moves(from, Piece::Knight, knight_attacks(from) & targets, moves);
        }
    }
}
