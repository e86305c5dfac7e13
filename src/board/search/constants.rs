//! Search constants.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Scores with absolute value >= this are considered checkmate scores
pub const MATE_THRESHOLD: i32 = 28000;

/// Score of being checkmated at the root; a mate found `ply` plies deep
/// scores `-MATE_SCORE + ply`
pub const MATE_SCORE: i32 = MATE_THRESHOLD + MAX_PLY as i32;

/// Bound wider than any reachable score
pub const INFINITY: i32 = 30000;

/// Deepest iteration a search will run
pub const MAX_SEARCH_DEPTH: u32 = 64;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores are tried earlier: TT move > captures > killers > quiet

/// Hash move (from transposition table) - highest priority
pub const TT_MOVE_SCORE: i32 = 1 << 20;

/// Base for captures and promotions, before the MVV-LVA term
pub const CAPTURE_SCORE: i32 = 1 << 16;

/// First killer move (quiet that caused beta cutoff at same ply)
pub const KILLER1_SCORE: i32 = 20000;

/// Second killer move (replaced killer)
pub const KILLER2_SCORE: i32 = 10000;
