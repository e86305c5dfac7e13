use std::time::Instant;

use log::debug;

use super::super::constants::{INFINITY, MATE_SCORE, MATE_THRESHOLD, MAX_SEARCH_DEPTH};
use super::super::{SearchIterationInfo, SearchLimits, SearchResult, SearchSession};
use super::SearchContext;
use crate::board::{Board, Move};

impl SearchContext<'_> {
    /// Principal variation: `first`, then the TT best-move chain while each
    /// stored move is legal and no position repeats.
    fn extract_pv(&mut self, first: Move, max_len: usize) -> Vec<Move> {
        let mut pv = vec![first];
        self.board.make_move(first);
        let mut seen = vec![self.board.hash()];

        while pv.len() < max_len {
            let Some(mv) = self
                .session
                .tt
                .probe(self.board.hash())
                .and_then(|entry| entry.best_move())
            else {
                break;
            };
            if !self.board.generate_moves().contains(mv) {
                break;
            }
            self.board.make_move(mv);
            pv.push(mv);
            let hash = self.board.hash();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);
        }

        for &mv in pv.iter().rev() {
            self.board.unmake_move(mv);
        }
        pv
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    fn iterative_deepening(
        &mut self,
        max_depth: u32,
        limits: &SearchLimits,
        fallback: Move,
    ) -> SearchResult {
        let start_time = Instant::now();
        let mut result = SearchResult {
            best_move: Some(fallback),
            score: 0,
            depth: 0,
            nodes: 0,
        };

        for depth in 1..=max_depth {
            self.root_best = None;
            self.seldepth = 0;
            let score = self.alphabeta(depth, -INFINITY, INFINITY, 0);

            if self.stopped {
                // Nothing completed: a partial first iteration beats the fallback
                if result.depth == 0 {
                    if let Some((mv, partial)) = self.root_best {
                        result.best_move = Some(mv);
                        result.score = partial;
                    }
                }
                debug!("search stopped during depth {depth}");
                break;
            }
            let Some((best_move, _)) = self.root_best else {
                break;
            };
            result = SearchResult {
                best_move: Some(best_move),
                score,
                depth,
                nodes: self.nodes,
            };

            let pv = self.extract_pv(best_move, depth as usize);
            debug!(
                "depth {depth} score {score} nodes {} pv {}",
                self.nodes,
                pv.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            );

            if let Some(callback) = &limits.info_callback {
                let time_ms = start_time.elapsed().as_millis() as u64;
                let nps = if time_ms > 0 {
                    self.nodes * 1000 / time_ms
                } else {
                    0
                };
                let mate_in = if score.abs() < MATE_THRESHOLD {
                    None
                } else if score > 0 {
                    Some((MATE_SCORE - score + 1) / 2)
                } else {
                    Some(-(MATE_SCORE + score) / 2)
                };
                callback(&SearchIterationInfo {
                    depth,
                    seldepth: self.seldepth,
                    nodes: self.nodes,
                    nps,
                    time_ms,
                    score,
                    mate_in,
                    pv,
                    hashfull: self.session.tt.hashfull_per_mille(),
                });
            }
        }

        result.nodes = self.nodes;
        result
    }
}

/// Run the main search algorithm
pub(in crate::board::search) fn run_search(
    board: &mut Board,
    session: &mut SearchSession,
    limits: &SearchLimits,
) -> SearchResult {
    let root_moves = board.generate_moves();
    if root_moves.is_empty() {
        let score = if board.is_check() { -MATE_SCORE } else { 0 };
        return SearchResult {
            best_move: None,
            score,
            depth: 0,
            nodes: 0,
        };
    }

    let max_depth = limits.depth.clamp(1, MAX_SEARCH_DEPTH);
    let mut ctx = SearchContext {
        board,
        session,
        node_limit: limits.nodes,
        nodes: 0,
        seldepth: 0,
        stopped: false,
        root_best: None,
    };
    let result = ctx.iterative_deepening(max_depth, limits, root_moves[0]);
    ctx.session.stats.seldepth = ctx.seldepth;
    result
}
