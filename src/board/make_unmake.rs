//! Reversible move application.
//!
//! `make_move` pushes the pre-move [`GameState`](super::GameState) and
//! updates the piece masks and the hash incrementally; `unmake_move` pops the
//! snapshot back and reverts the masks. [`Board::apply`] wraps the pair in a
//! guard that unmakes on drop.

use std::ops::{Deref, DerefMut};

use crate::zobrist::ZOBRIST;

use super::state::GameState;
use super::{Bitboard, Board, Color, Move, Piece, Square};

/// Rook origin and destination for a castle whose king lands on `king_to`.
#[inline]
fn castle_rook_squares(king_to: Square, kingside: bool) -> (Square, Square) {
    let idx = king_to.index();
    if kingside {
        (Square::from_index(idx + 1), Square::from_index(idx - 1))
    } else {
        (Square::from_index(idx - 2), Square::from_index(idx + 1))
    }
}

/// Square of the pawn removed by an en passant capture landing on `to`.
#[inline]
fn en_passant_victim(to: Square, mover: Color) -> Square {
    match mover {
        Color::White => Square::from_index(to.index() - 8),
        Color::Black => Square::from_index(to.index() + 8),
    }
}

impl Board {
    /// Flip a piece in its kind mask, its color aggregate and the hash.
    #[inline]
    fn toggle_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.toggle_masks(color, piece, sq);
        self.state.hash ^= ZOBRIST.piece(color, piece, sq);
    }

    /// Flip a piece in its kind mask and color aggregate only.
    #[inline]
    fn toggle_masks(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] ^= bit;
        self.occupied[color.index()] ^= bit;
    }

    /// Apply a pseudo-legal move produced for this position.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_HISTORY`](super::MAX_HISTORY) moves are
    /// outstanding.
    pub fn make_move(&mut self, mv: Move) {
        let prev = self.state;
        let us = prev.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();
        debug_assert_eq!(
            self.piece_of(us, from),
            Some(piece),
            "make_move {mv:?}: moving piece not on origin"
        );

        let captured = if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else if mv.is_castling() {
            None
        } else {
            self.piece_of(them, to)
        };

        self.history.push(prev);

        self.state.hash ^= ZOBRIST.castling(prev.castling) ^ ZOBRIST.side();
        if let Some(ep) = prev.en_passant {
            self.state.hash ^= ZOBRIST.en_passant(ep);
        }

        if mv.is_castling() {
            let (rook_from, rook_to) = castle_rook_squares(to, mv.is_castle_kingside());
            self.toggle_piece(us, Piece::King, from);
            self.toggle_piece(us, Piece::King, to);
            self.toggle_piece(us, Piece::Rook, rook_from);
            self.toggle_piece(us, Piece::Rook, rook_to);
        } else {
            if mv.is_en_passant() {
                self.toggle_piece(them, Piece::Pawn, en_passant_victim(to, us));
            } else if let Some(victim) = captured {
                self.toggle_piece(them, victim, to);
            }
            self.toggle_piece(us, piece, from);
            self.toggle_piece(us, mv.promotion_piece().unwrap_or(piece), to);
        }

        let castling = prev
            .castling
            .after_touching(Bitboard::from_square(from) | Bitboard::from_square(to));
        let en_passant = if mv.is_double_pawn_push() {
            Some(Square::from_index((from.index() + to.index()) / 2))
        } else {
            None
        };

        self.state.hash ^= ZOBRIST.castling(castling);
        if let Some(ep) = en_passant {
            self.state.hash ^= ZOBRIST.en_passant(ep);
        }

        self.state = GameState {
            side_to_move: them,
            castling,
            en_passant,
            halfmove_clock: if piece == Piece::Pawn || captured.is_some() {
                0
            } else {
                prev.halfmove_clock + 1
            },
            fullmove_number: prev.fullmove_number + u32::from(us == Color::Black),
            captured,
            hash: self.state.hash,
        };
    }

    /// Revert the most recent `make_move(mv)`.
    ///
    /// # Panics
    ///
    /// Panics if no move is outstanding.
    pub fn unmake_move(&mut self, mv: Move) {
        let captured = self.state.captured;
        let prev = self.history.pop();
        let us = prev.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        if mv.is_castling() {
            let (rook_from, rook_to) = castle_rook_squares(to, mv.is_castle_kingside());
            self.toggle_masks(us, Piece::King, to);
            self.toggle_masks(us, Piece::King, from);
            self.toggle_masks(us, Piece::Rook, rook_to);
            self.toggle_masks(us, Piece::Rook, rook_from);
        } else {
            self.toggle_masks(us, mv.promotion_piece().unwrap_or(piece), to);
            self.toggle_masks(us, piece, from);
            if mv.is_en_passant() {
                self.toggle_masks(them, Piece::Pawn, en_passant_victim(to, us));
            } else if let Some(victim) = captured {
                self.toggle_masks(them, victim, to);
            }
        }

        self.state = prev;
    }

    /// Apply `mv` and return a guard that unmakes it when dropped.
    ///
    /// The guard derefs to the board, so the new position can be inspected
    /// or searched further through it.
    pub fn apply(&mut self, mv: Move) -> MoveGuard<'_> {
        self.make_move(mv);
        MoveGuard { board: self, mv }
    }

    /// Forget all applied moves, making the current position the new root.
    ///
    /// Used after replaying a game record so long games do not exhaust the
    /// history stack.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// A move applied through [`Board::apply`], undone on drop.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    mv: Move,
}

impl MoveGuard<'_> {
    /// The move this guard will unmake
    #[must_use]
    pub fn applied(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.unmake_move(self.mv);
    }
}
