use std::fmt;

use crate::zobrist::ZOBRIST;

use super::error::BoardInvariantError;
use super::{Bitboard, CastlingRights, Color, Piece, Square};

/// Deepest stack of applied-but-not-unmade moves a board supports.
pub const MAX_HISTORY: usize = 2048;

/// Everything about a position that is not piece placement.
///
/// Small and `Copy`: the pre-move value is pushed before each move and popped
/// back wholesale on unmake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Piece kind taken by the move that produced this position
    pub(crate) captured: Option<Piece>,
    pub(crate) hash: u64,
}

impl GameState {
    const fn initial() -> Self {
        GameState {
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            captured: None,
            hash: 0,
        }
    }
}

/// Bounded stack of pre-move game states, one per applied move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct History {
    states: Vec<GameState>,
}

impl History {
    #[inline]
    pub(crate) fn push(&mut self, state: GameState) {
        assert!(
            self.states.len() < MAX_HISTORY,
            "move history overflow: more than {MAX_HISTORY} moves applied without unmake"
        );
        self.states.push(state);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> GameState {
        match self.states.pop() {
            Some(state) => state,
            None => panic!("move history underflow: unmake without a matching make"),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) state: GameState,
    pub(crate) history: History,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in (0u8..).zip(back_rank) {
            board.put_piece(Square::from_index(file as usize), Color::White, piece);
            board.put_piece(Square::from_index(8 + file as usize), Color::White, Piece::Pawn);
            board.put_piece(Square::from_index(48 + file as usize), Color::Black, Piece::Pawn);
            board.put_piece(Square::from_index(56 + file as usize), Color::Black, piece);
        }

        board.state.castling = CastlingRights::all();
        board.state.hash = board.compute_hash();
        board
    }

    /// A board with no pieces, White to move and no rights.
    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            state: GameState::initial(),
            history: History::default(),
        }
    }

    /// Place a piece without touching the hash. Only for position setup.
    pub(crate) fn put_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.state.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.state.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.state.fullmove_number
    }

    /// Piece kind captured by the last applied move, if any
    #[inline]
    #[must_use]
    pub fn last_captured(&self) -> Option<Piece> {
        self.state.captured
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.state.hash
    }

    /// Snapshot of the current game state
    #[inline]
    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// Number of applied moves that have not been unmade
    #[inline]
    #[must_use]
    pub fn ply_depth(&self) -> usize {
        self.history.len()
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    /// Color and kind of the piece on `sq`, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let color = if self.occupied[0].contains(sq) {
            Color::White
        } else if self.occupied[1].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|&piece| self.pieces[color.index()][piece.index()].contains(sq))
            .map(|piece| (color, piece))
    }

    /// Kind of `color`'s piece on `sq`, scanning only that color's masks
    #[inline]
    pub(crate) fn piece_of(&self, color: Color, sq: Square) -> Option<Piece> {
        if !self.occupied[color.index()].contains(sq) {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|&piece| self.pieces[color.index()][piece.index()].contains(sq))
    }

    /// Square of `color`'s king.
    ///
    /// Every board built by this crate holds exactly one king per side.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        match self.pieces(color, Piece::King).lsb() {
            Some(sq) => sq,
            None => panic!("{color} has no king"),
        }
    }

    /// Hash of the position computed from scratch.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece).iter() {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }
        if self.state.side_to_move == Color::Black {
            hash ^= ZOBRIST.side();
        }
        hash ^= ZOBRIST.castling(self.state.castling);
        if let Some(ep) = self.state.en_passant {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    /// Check the mask partition, the color aggregates and the stored hash.
    pub fn validate(&self) -> Result<(), BoardInvariantError> {
        let mut seen = Bitboard::EMPTY;
        for color in Color::BOTH {
            let mut union = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let mask = self.pieces(color, piece);
                if let Some(square) = (seen & mask).lsb() {
                    return Err(BoardInvariantError::OverlappingMasks { square });
                }
                seen |= mask;
                union |= mask;
            }
            if union != self.occupied_by(color) {
                return Err(BoardInvariantError::AggregateMismatch { color });
            }
        }

        let computed = self.compute_hash();
        if computed != self.state.hash {
            return Err(BoardInvariantError::HashMismatch {
                stored: self.state.hash,
                computed,
            });
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for rank in (0..8u8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8u8 {
                let sq = Square::from_index((rank * 8 + file) as usize);
                let c = match self.piece_at(sq) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "  +-----------------+")?;
        writeln!(f, "    a b c d e f g h")?;
        writeln!(f, "Fen: {}", self.to_fen())?;
        write!(f, "Key: {:016X}", self.hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_is_consistent() {
        let board = Board::new();
        assert_eq!(board.validate(), Ok(()));
        assert_eq!(board.occupancy().popcount(), 32);
        assert_eq!(board.king_square(Color::White), Square::E1);
        assert_eq!(board.king_square(Color::Black), Square::E8);
        assert_eq!(
            board.piece_at(Square::D8),
            Some((Color::Black, Piece::Queen))
        );
        assert_eq!(board.piece_at(Square::from_index(28)), None);
        assert_eq!(board.ply_depth(), 0);
    }

    #[test]
    fn test_validate_detects_overlap() {
        let mut board = Board::new();
        board.pieces[Color::White.index()][Piece::Queen.index()] |=
            Bitboard::from_square(Square::A1);
        assert_eq!(
            board.validate(),
            Err(BoardInvariantError::OverlappingMasks { square: Square::A1 })
        );
    }

    #[test]
    fn test_validate_detects_stale_hash() {
        let mut board = Board::new();
        board.state.hash ^= 1;
        assert!(matches!(
            board.validate(),
            Err(BoardInvariantError::HashMismatch { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "move history underflow")]
    fn test_history_underflow_panics() {
        let mut history = History::default();
        history.pop();
    }

    #[test]
    #[should_panic(expected = "move history overflow")]
    fn test_history_overflow_panics() {
        let mut history = History::default();
        for _ in 0..=MAX_HISTORY {
            history.push(GameState::initial());
        }
    }
}
