//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with per-iteration reporting
//! - Fail-soft negamax alpha-beta
//! - Quiescence search with stand-pat
//! - Move ordering (TT move, MVV-LVA, killers)
//! - Transposition table for move ordering and cutoffs

mod constants;
mod move_order;
mod simple;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::eval::{Evaluator, MaterialEvaluator};
use crate::tt::TranspositionTable;

use super::{Board, Move};

pub use constants::{MATE_SCORE, MATE_THRESHOLD, MAX_SEARCH_DEPTH};
pub use move_order::{mvv_lva, KillerTable};

/// Default transposition table size in MB
pub const DEFAULT_TT_MB: usize = 16;

/// Outcome of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score of `best_move` from the side to move's perspective
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u32,
    /// Nodes visited, quiescence included
    pub nodes: u64,
}

/// Statistics tracked during search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub seldepth: u32,
    pub tt_hits: u64,
    pub beta_cutoffs: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: i32,
    /// Moves to mate, negative when being mated
    pub mate_in: Option<i32>,
    pub pv: Vec<Move>,
    pub hashfull: u32,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Limits for one search.
#[derive(Clone)]
pub struct SearchLimits {
    /// Maximum iteration depth, clamped to `1..=MAX_SEARCH_DEPTH`
    pub depth: u32,
    /// Stop after visiting this many nodes
    pub nodes: Option<u64>,
    /// Called after every completed iteration
    pub info_callback: Option<SearchInfoCallback>,
}

impl SearchLimits {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth,
            nodes: None,
            info_callback: None,
        }
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Search state persisted across searches.
///
/// Owns the transposition table, the killer table, the statistics, the
/// evaluator handle and the cooperative stop flag. One session serves one
/// search at a time.
pub struct SearchSession {
    pub(crate) tt: TranspositionTable,
    pub(crate) killers: KillerTable,
    pub(crate) stats: SearchStats,
    pub(crate) evaluator: Arc<dyn Evaluator>,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) generation: u8,
}

impl SearchSession {
    #[must_use]
    pub fn new(tt_mb: usize, evaluator: Arc<dyn Evaluator>) -> Self {
        SearchSession {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::new(),
            stats: SearchStats::default(),
            evaluator,
            stop: Arc::new(AtomicBool::new(false)),
            generation: 0,
        }
    }

    /// Replace the evaluator used at the leaves.
    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Evaluator>) {
        self.evaluator = evaluator;
    }

    /// Reallocate the transposition table, dropping its contents.
    pub fn resize_tt(&mut self, tt_mb: usize) {
        self.tt = TranspositionTable::new(tt_mb);
    }

    /// Forget everything learned from earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.reset();
        self.stats.reset();
        self.generation = 0;
    }

    /// Shared handle to the stop flag, for stopping a search from another
    /// thread.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Ask the running search to return. The flag stays set until
    /// [`SearchSession::reset_stop`].
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn reset_stop(&self) {
        self.stop.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }

    fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.stats.reset();
        self.killers.reset();
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        SearchSession::new(DEFAULT_TT_MB, Arc::new(MaterialEvaluator))
    }
}

/// Run an iterative-deepening search within `limits`.
///
/// The board is restored to its original state before returning. If the
/// search is stopped, the result of the last completed iteration is
/// returned.
pub fn search(board: &mut Board, session: &mut SearchSession, limits: &SearchLimits) -> SearchResult {
    session.new_search();
    let result = simple::run_search(board, session, limits);
    session.stats.nodes = result.nodes;
    result
}

/// Find best move with fixed depth limit
///
/// # Example
/// ```
/// use magic_chess::board::{find_best_move, Board, SearchSession};
///
/// let mut board = Board::new();
/// let mut session = SearchSession::default();
/// let best = find_best_move(&mut board, &mut session, 2);
/// assert!(best.is_some());
/// ```
pub fn find_best_move(board: &mut Board, session: &mut SearchSession, depth: u32) -> Option<Move> {
    search(board, session, &SearchLimits::depth(depth)).best_move
}
