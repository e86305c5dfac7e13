//! Perft: leaf-node counting over the legal move tree.

use super::{Board, Move};

impl Board {
    /// Count leaf nodes of the legal move tree to `depth` plies.
    ///
    /// The board is left exactly as it was found.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let mut child = self.apply(mv);
            nodes += child.perft(depth - 1);
        }
        nodes
    }

    /// Per-root-move perft counts, in generation order.
    pub fn divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        self.generate_moves()
            .into_iter()
            .map(|mv| {
                let mut child = self.apply(mv);
                (mv, child.perft(depth - 1))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_depth_zero_is_one() {
        assert_eq!(Board::new().perft(0), 1);
        assert!(Board::new().divide(0).is_empty());
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut board = Board::new();
        let split = board.divide(3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 8902);
        assert_eq!(board, Board::new());
    }
}
