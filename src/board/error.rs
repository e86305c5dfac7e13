//! Error types for board input validation.
//!
//! These cover malformed external input only. Broken internal invariants
//! (unbalanced unmake, history overflow) panic instead.

use thiserror::Error;

use super::types::{Color, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// FEN string lacks piece placement or side to move
    #[error("FEN must have at least 2 fields, found {found}")]
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    #[error("invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    #[error("invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    /// Placement field does not describe exactly 8 ranks
    #[error("FEN placement has {found} ranks, expected 8")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than 8 files
    #[error("rank {rank} describes {files} files, expected 8")]
    BadRankLength { rank: usize, files: usize },
    /// Each side needs exactly one king
    #[error("{color} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: u32 },
    /// More men than a side starts the game with
    #[error("{color} has {count} pieces, at most 16 are possible")]
    TooManyPieces { color: Color, count: u32 },
    /// Pawns plus promoted pieces exceed the eight pawns a side starts with
    #[error("{color} has {pawns} pawns and {promoted} promoted pieces, at most 8 together")]
    ImpossibleMaterial {
        color: Color,
        pawns: u32,
        promoted: u32,
    },
    /// Pawns can never stand on the first or last rank
    #[error("pawn on back rank square {square}")]
    PawnOnBackRank { square: Square },
    /// The side that just moved left its king attacked
    #[error("{color} is in check but it is not their turn")]
    OpponentInCheck { color: Color },
}

/// Error type for move notation decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    #[error("move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    /// Invalid square notation in move
    #[error("invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    #[error("invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    #[error("rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: u8 },
    /// File out of bounds (must be 0-7)
    #[error("file {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: u8 },
    /// Invalid algebraic notation
    #[error("invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

/// A broken board invariant found by [`Board::validate`](super::Board::validate)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardInvariantError {
    /// Two piece masks claim the same square
    #[error("piece masks overlap on {square}")]
    OverlappingMasks { square: Square },
    /// A color aggregate differs from the union of that color's piece masks
    #[error("{color} aggregate does not match its piece masks")]
    AggregateMismatch { color: Color },
    /// The stored hash differs from one recomputed from scratch
    #[error("stored hash {stored:#018x} differs from recomputed {computed:#018x}")]
    HashMismatch { stored: u64, computed: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_display() {
        let err = FenError::TooFewParts { found: 1 };
        assert_eq!(err.to_string(), "FEN must have at least 2 fields, found 1");

        let err = FenError::InvalidPiece { char: 'x' };
        assert_eq!(err.to_string(), "invalid piece character 'x' in FEN");

        let err = FenError::KingCount {
            color: Color::Black,
            count: 0,
        };
        assert_eq!(err.to_string(), "Black has 0 kings, expected exactly one");

        let err = FenError::OpponentInCheck {
            color: Color::Black,
        };
        assert_eq!(err.to_string(), "Black is in check but it is not their turn");
    }

    #[test]
    fn test_move_parse_error_display() {
        let err = MoveParseError::InvalidLength { len: 3 };
        assert_eq!(err.to_string(), "move must be 4-5 characters, found 3");

        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert_eq!(err.to_string(), "illegal move 'e2e5'");
    }

    #[test]
    fn test_square_error_display() {
        let err = SquareError::RankOutOfBounds { rank: 8 };
        assert_eq!(err.to_string(), "rank 8 out of bounds (must be 0-7)");

        let err = SquareError::InvalidNotation {
            notation: "z9".to_string(),
        };
        assert_eq!(err.to_string(), "invalid square notation 'z9'");
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<FenError>();
        assert_error::<MoveParseError>();
        assert_error::<SquareError>();
    }
}
