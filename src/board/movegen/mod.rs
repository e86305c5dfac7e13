//! Pseudo-legal move generation.
//!
//! Moves produced here obey piece movement rules but may leave the mover's
//! king attacked; `legality.rs` filters them.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{Bitboard, Board, Move, MoveList, Piece, Square};

/// Which subset of pseudo-legal moves to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GenKind {
    /// Every pseudo-legal move
    All,
    /// Captures only, including en passant and capturing promotions
    Captures,
}

impl Board {
    /// All pseudo-legal moves for the side to move.
    #[must_use]
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(GenKind::All, &mut moves);
        moves
    }

    /// Pseudo-legal captures for the side to move.
    #[must_use]
    pub fn generate_pseudo_captures(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(GenKind::Captures, &mut moves);
        moves
    }

    fn generate_into(&self, kind: GenKind, moves: &mut MoveList) {
        self.generate_pawn_moves(kind, moves);
        self.generate_knight_moves(kind, moves);
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            self.generate_slider_moves(piece, kind, moves);
        }
        self.generate_king_moves(kind, moves);
    }

    /// Squares a non-pawn piece may land on
    #[inline]
    fn move_targets(&self, kind: GenKind) -> Bitboard {
        let us = self.side_to_move();
        match kind {
            GenKind::All => !self.occupied_by(us),
            GenKind::Captures => self.occupied_by(us.opponent()),
        }
    }

    /// Push one move per destination, flagging those that land on an enemy piece.
    #[inline]
    fn push_piece_moves(&self, from: Square, piece: Piece, dests: Bitboard, moves: &mut MoveList) {
        let enemies = self.occupied_by(self.side_to_move().opponent());
        for to in dests.iter() {
            if enemies.contains(to) {
                moves.push(Move::capture(from, to, piece));
            } else {
                moves.push(Move::quiet(from, to, piece));
            }
        }
    }
}
