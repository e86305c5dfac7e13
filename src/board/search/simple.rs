//! Core search implementation.
//!
//! This module implements:
//! - Iterative deepening from depth 1
//! - Fail-soft negamax alpha-beta with checkmate / stalemate scoring
//! - Transposition table probing and storing with ply-relative mate scores
//! - Quiescence search with stand-pat
//! - Move ordering (TT move, MVV-LVA, killers)

mod iterative;
mod quiescence;

pub(super) use iterative::run_search;

use std::sync::atomic::Ordering;

use crate::tt::BoundType;

use super::constants::{INFINITY, MATE_SCORE, MATE_THRESHOLD};
use super::move_order::order_moves;
use super::SearchSession;
use crate::board::{Board, Move, MAX_PLY};

/// Search context for a single search
pub(super) struct SearchContext<'a> {
    pub board: &'a mut Board,
    pub session: &'a mut SearchSession,
    pub node_limit: Option<u64>,
    pub nodes: u64,
    pub seldepth: u32,
    /// Set once the stop flag or the node limit is hit; results after that
    /// point are discarded
    pub stopped: bool,
    /// Best root move and score of the iteration in progress
    pub root_best: Option<(Move, i32)>,
}

/// Convert a score to its ply-independent TT form.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Re-base a TT score to the probing node's ply.
#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

impl SearchContext<'_> {
    /// Check the stop flag and the node budget.
    fn should_stop(&mut self) -> bool {
        if !self.stopped {
            let over_budget = self.node_limit.is_some_and(|limit| self.nodes >= limit);
            self.stopped = over_budget || self.session.stop.load(Ordering::Relaxed);
        }
        self.stopped
    }

    /// Evaluate position from side-to-move's perspective, kept clear of the
    /// mate score range.
    #[inline]
    fn evaluate(&self) -> i32 {
        self.session
            .evaluator
            .evaluate(self.board)
            .clamp(-MATE_THRESHOLD + 1, MATE_THRESHOLD - 1)
    }

    #[inline]
    fn visit(&mut self, ply: usize) {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply as u32);
    }

    /// Fail-soft negamax. Returns 0 once the search has been stopped; callers
    /// must check `stopped` before trusting the result.
    pub fn alphabeta(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.should_stop() {
            return 0;
        }
        if depth == 0 {
            return self.quiesce(alpha, beta, ply);
        }
        self.visit(ply);
        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let hash = self.board.hash();
        let alpha_orig = alpha;

        let mut tt_move = Move::NULL;
        if let Some(entry) = self.session.tt.probe(hash) {
            tt_move = entry.best_move().unwrap_or(Move::NULL);
            if ply > 0 && entry.depth() >= depth {
                let score = score_from_tt(entry.score(), ply);
                let cutoff = match entry.bound_type() {
                    BoundType::Exact => true,
                    BoundType::LowerBound => score >= beta,
                    BoundType::UpperBound => score <= alpha,
                };
                if cutoff {
                    self.session.stats.tt_hits += 1;
                    return score;
                }
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return if self.board.is_check() {
                -MATE_SCORE + ply as i32
            } else {
                0
            };
        }

        let mut ordered = order_moves(self.board, &moves, tt_move, &self.session.killers, ply);
        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL;

        for i in 0..ordered.len() {
            let Some(scored) = ordered.pick_best(i) else {
                break;
            };
            let mv = scored.mv;

            self.board.make_move(mv);
            let score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1);
            self.board.unmake_move(mv);

            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
                if ply == 0 {
                    self.root_best = Some((mv, score));
                }
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if mv.is_quiet() {
                    self.session.killers.update(ply, mv);
                }
                self.session.stats.beta_cutoffs += 1;
                break;
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > alpha_orig {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.session.tt.store(
            hash,
            depth,
            score_to_tt(best_score, ply),
            bound,
            Some(best_move),
            self.session.generation,
        );

        best_score
    }
}
