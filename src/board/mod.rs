//! Chess board representation and game logic.
//!
//! Uses bitboards with magic-indexed slider attacks for move generation and
//! reversible make/unmake with an incrementally maintained Zobrist hash.
//! Supports full chess rules including castling, en passant, and promotions.
//!
//! # Example
//! ```
//! use magic_chess::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

pub mod attack_tables;
mod error;
mod eval;
mod fen;
mod legality;
mod make_unmake;
mod movegen;
pub mod nnue;
mod perft;
pub mod prelude;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{BoardInvariantError, FenError, MoveParseError, SquareError};
pub use eval::{Evaluator, MaterialEvaluator};
pub use fen::START_FEN;
pub use make_unmake::MoveGuard;
pub use state::{Board, GameState, MAX_HISTORY};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveListIntoIter, Piece,
    Square, SubsetIter,
};

// Public API - search functions and configuration
pub use search::{
    find_best_move, mvv_lva, search, KillerTable, SearchInfoCallback, SearchIterationInfo,
    SearchLimits, SearchResult, SearchSession, SearchStats, DEFAULT_TT_MB, MATE_SCORE,
    MATE_THRESHOLD, MAX_SEARCH_DEPTH,
};

pub(crate) use types::{
    castle_bit, ScoredMoveList, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
    MAX_PLY, PROMOTION_PIECES,
};
