//! Move ordering utilities for search.

use super::constants::{CAPTURE_SCORE, KILLER1_SCORE, KILLER2_SCORE, TT_MOVE_SCORE};
use crate::board::{Board, Move, MoveList, Piece, ScoredMoveList, MAX_PLY};

/// Two quiet moves per ply that recently caused a beta cutoff.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

/// MVV-LVA score: most valuable victim first, least valuable attacker as
/// the tie-break. Promotions add the value gained by the new piece.
#[must_use]
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    let victim = if mv.is_en_passant() {
        Some(Piece::Pawn)
    } else if mv.is_capture() {
        board.piece_of(board.side_to_move().opponent(), mv.to())
    } else {
        None
    };

    let mut score = victim.map_or(0, |piece| piece.value() * 10 - mv.piece().value() / 10);
    if let Some(promo) = mv.promotion_piece() {
        score += promo.value() - Piece::Pawn.value();
    }
    score
}

/// Order moves for search: TT move, then captures and promotions by
/// MVV-LVA, then killers, then the remaining quiet moves.
pub(crate) fn order_moves(
    board: &Board,
    moves: &MoveList,
    tt_move: Move,
    killers: &KillerTable,
    ply: usize,
) -> ScoredMoveList {
    let killer1 = killers.primary(ply);
    let killer2 = killers.secondary(ply);

    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let score = if mv == tt_move {
            TT_MOVE_SCORE
        } else if mv.is_tactical() {
            CAPTURE_SCORE + mvv_lva(board, mv)
        } else if mv == killer1 {
            KILLER1_SCORE
        } else if mv == killer2 {
            KILLER2_SCORE
        } else {
            0
        };
        scored.push(mv, score);
    }
    scored
}

/// Order captures for quiescence by MVV-LVA alone.
pub(crate) fn order_captures(board: &Board, moves: &MoveList) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        scored.push(mv, mvv_lva(board, mv));
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn test_mvv_lva_prefers_valuable_victims() {
        // Pawn on d4 can take the queen on e5 or the knight on c5
        let mut board = Board::from_fen("4k3/8/8/2n1q3/3P4/8/8/7K w - - 0 1").unwrap();
        let takes_queen = board.parse_move("d4e5").unwrap();
        let takes_knight = board.parse_move("d4c5").unwrap();
        assert!(mvv_lva(&board, takes_queen) > mvv_lva(&board, takes_knight));
    }

    #[test]
    fn test_order_moves_priorities() {
        let mut board = Board::from_fen("4k3/8/8/2n1q3/3P4/8/8/7K w - - 0 1").unwrap();
        let moves = board.generate_moves();
        let capture = board.parse_move("d4e5").unwrap();
        let tt_move = board.parse_move("h1g1").unwrap();
        let killer = board.parse_move("h1g2").unwrap();

        let mut killers = KillerTable::new();
        killers.update(3, killer);

        let mut ordered = order_moves(&board, &moves, tt_move, &killers, 3);
        let picked: Vec<Move> = (0..3)
            .map(|i| ordered.pick_best(i).unwrap().mv)
            .collect();
        assert_eq!(picked[0], tt_move);
        assert_eq!(picked[1], capture);
        assert!(picked[2].is_capture());
        assert_eq!(ordered.pick_best(3).unwrap().mv, killer);
    }

    #[test]
    fn test_killer_table_shifts() {
        let mut killers = KillerTable::new();
        let a = Move::quiet(Square::from_index(1), Square::from_index(18), Piece::Knight);
        let b = Move::quiet(Square::from_index(6), Square::from_index(21), Piece::Knight);
        killers.update(0, a);
        killers.update(0, a);
        assert_eq!(killers.secondary(0), Move::NULL);
        killers.update(0, b);
        assert_eq!(killers.primary(0), b);
        assert_eq!(killers.secondary(0), a);
        killers.update(MAX_PLY, a);
        assert_eq!(killers.primary(MAX_PLY), Move::NULL);
        killers.reset();
        assert_eq!(killers.primary(0), Move::NULL);
    }
}
