use super::super::attack_tables::pawn_attacks;
use super::super::{Bitboard, Board, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};
use super::GenKind;

fn push_promotions(from: Square, to: Square, capture: bool, moves: &mut MoveList) {
    for piece in PROMOTION_PIECES {
        moves.push(Move::promotion(from, to, piece, capture));
    }
}

impl Board {
    pub(super) fn generate_pawn_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        let enemies = self.occupied_by(us.opponent());
        let empty = !self.occupancy();
        let (push, start_rank, promotion_rank): (i8, u8, u8) = match us {
            Color::White => (1, 1, 7),
            Color::Black => (-1, 6, 0),
        };
        let ep_target = self.en_passant();
        let ep_mask = ep_target.map_or(Bitboard::EMPTY, Bitboard::from_square);

        for from in self.pieces(us, Piece::Pawn).iter() {
            let attacks = pawn_attacks(us, from);
            for to in (attacks & enemies).iter() {
                if to.rank() == promotion_rank {
                    push_promotions(from, to, true, moves);
                } else {
                    moves.push(Move::capture(from, to, Piece::Pawn));
                }
            }
            if let Some(ep) = ep_target {
                if !(attacks & ep_mask).is_empty() {
                    moves.push(Move::en_passant(from, ep));
                }
            }

            if kind == GenKind::Captures {
                continue;
            }

            let Some(one) = from.offset(push, 0) else {
                continue;
            };
            if !empty.contains(one) {
                continue;
            }
            if one.rank() == promotion_rank {
                push_promotions(from, one, false, moves);
                continue;
            }
            moves.push(Move::quiet(from, one, Piece::Pawn));
            if from.rank() == start_rank {
                if let Some(two) = one.offset(push, 0) {
                    if empty.contains(two) {
                        moves.push(Move::double_pawn_push(from, two));
                    }
                }
            }
        }
    }
}
