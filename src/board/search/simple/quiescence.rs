use super::super::constants::{INFINITY, MATE_SCORE};
use super::super::move_order::order_captures;
use super::SearchContext;
use crate::board::MAX_PLY;

impl SearchContext<'_> {
    /// Quiescence search over legal captures with stand-pat.
    ///
    /// In check there is no stand-pat: every legal evasion is searched and a
    /// position without one scores as mate.
    pub fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.visit(ply);
        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let in_check = self.board.is_check();
        let (moves, mut best_score) = if in_check {
            let moves = self.board.generate_moves();
            if moves.is_empty() {
                return -MATE_SCORE + ply as i32;
            }
            (moves, -INFINITY)
        } else {
            let stand_pat = self.evaluate();
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            (self.board.generate_captures(), stand_pat)
        };

        let mut ordered = order_captures(self.board, &moves);
        for i in 0..ordered.len() {
            let Some(scored) = ordered.pick_best(i) else {
                break;
            };
            let mv = scored.mv;

            self.board.make_move(mv);
            let score = -self.quiesce(-beta, -alpha, ply + 1);
            self.board.unmake_move(mv);

            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
            }
            if score >= beta {
                return score;
            }
            alpha = alpha.max(score);
        }

        best_score
    }
}
