//! Engine controller implementation.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::info;
use parking_lot::Mutex;

use crate::board::nnue::{EvalLoadError, NnueNetwork};
use crate::board::{
    search, Board, MaterialEvaluator, SearchInfoCallback, SearchLimits, SearchResult,
    SearchSession,
};
use crate::config::EngineConfig;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Handle to a running or finished search thread
pub struct SearchJob {
    handle: JoinHandle<()>,
}

impl SearchJob {
    /// Whether the search thread has returned
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    fn wait(self) {
        let _ = self.handle.join();
    }
}

/// Parameters for starting a new search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum iteration depth
    pub depth: u32,
    /// Optional node budget
    pub nodes: Option<u64>,
}

impl SearchParams {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchParams { depth, nodes: None }
    }

    fn limits(self, info_callback: Option<SearchInfoCallback>) -> SearchLimits {
        SearchLimits {
            depth: self.depth,
            nodes: self.nodes,
            info_callback,
        }
    }
}

/// Engine controller managing search and game state
pub struct EngineController {
    /// Current board position
    board: Board,
    /// Search session (transposition table, killers, evaluator)
    session: Arc<Mutex<SearchSession>>,
    /// Copy of the session's stop flag, usable while a search holds the lock
    stop: Arc<AtomicBool>,
    /// Active search job (if any)
    current_job: Option<SearchJob>,
    /// Optional callback for per-iteration search info
    info_callback: Option<SearchInfoCallback>,
}

impl EngineController {
    /// Create a controller with a material-only evaluator.
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        let session = SearchSession::new(tt_mb, Arc::new(MaterialEvaluator));
        let stop = session.stop_handle();
        EngineController {
            board: Board::new(),
            session: Arc::new(Mutex::new(session)),
            stop,
            current_job: None,
            info_callback: None,
        }
    }

    /// Create a controller from startup configuration, loading the
    /// configured network file if there is one.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EvalLoadError> {
        let mut controller = EngineController::new(config.hash_mb);
        if let Some(path) = &config.eval_file {
            controller.load_eval_file(path)?;
        }
        Ok(controller)
    }

    /// Get a reference to the current board
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get a mutable reference to the current board
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Set the board position
    pub fn set_board(&mut self, board: Board) {
        self.stop_search();
        self.board = board;
    }

    /// Get a reference to the search session
    #[must_use]
    pub fn session(&self) -> &Arc<Mutex<SearchSession>> {
        &self.session
    }

    /// Reset the board to starting position and forget earlier searches
    pub fn new_game(&mut self) {
        self.stop_search();
        self.board = Board::new();
        self.session.lock().clear();
    }

    /// Stop any active search and wait for its thread
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            self.stop.store(true, Ordering::Relaxed);
            job.wait();
        }
    }

    /// Let an active search run to completion and wait for its thread
    pub fn wait_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.wait();
        }
    }

    /// Signal stop to active search (non-blocking)
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Check if a search thread is still running
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Start a search on a worker thread.
    ///
    /// The `on_complete` callback runs on that thread with the result.
    pub fn start_search<F>(&mut self, params: SearchParams, on_complete: F) -> io::Result<()>
    where
        F: FnOnce(SearchResult) + Send + 'static,
    {
        self.stop_search();
        self.stop.store(false, Ordering::Relaxed);

        let mut search_board = self.board.clone();
        let session = Arc::clone(&self.session);
        let limits = params.limits(self.info_callback.clone());

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = {
                    let mut guard = session.lock();
                    search(&mut search_board, &mut guard, &limits)
                };
                on_complete(result);
            })?;

        self.current_job = Some(SearchJob { handle });
        Ok(())
    }

    /// Run a search on the calling thread.
    pub fn search_blocking(&mut self, params: SearchParams) -> SearchResult {
        self.stop_search();
        self.stop.store(false, Ordering::Relaxed);
        let limits = params.limits(self.info_callback.clone());
        let mut session = self.session.lock();
        search(&mut self.board, &mut session, &limits)
    }

    /// Resize the transposition table
    pub fn resize_hash(&mut self, mb: usize) {
        self.stop_search();
        self.session.lock().resize_tt(mb);
    }

    /// Load an NNUE network and use it for all later searches.
    ///
    /// On failure the current evaluator stays in place.
    pub fn load_eval_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EvalLoadError> {
        let network = NnueNetwork::load(path.as_ref())?;
        self.stop_search();
        self.session.lock().set_evaluator(Arc::new(network));
        info!("evaluator switched to {}", path.as_ref().display());
        Ok(())
    }

    /// Set callback for iteration info reporting.
    pub fn set_info_callback(&mut self, cb: Option<SearchInfoCallback>) {
        self.info_callback = cb;
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}
