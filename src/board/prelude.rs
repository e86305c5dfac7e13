//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! # Example
//! ```
//! use magic_chess::board::prelude::*;
//!
//! let mut board = Board::new();
//! let mut session = SearchSession::default();
//! let best = find_best_move(&mut board, &mut session, 1);
//! assert!(best.is_some());
//! ```

pub use super::{
    find_best_move, search, Board, CastlingRights, Color, Evaluator, FenError, MaterialEvaluator,
    Move, MoveList, MoveParseError, Piece, SearchLimits, SearchResult, SearchSession, Square,
    SquareError,
};
