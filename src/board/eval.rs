//! Static evaluation contract used by the search.

use super::{Board, Color, Piece};

/// Scores a position in centipawns from the side to move's perspective.
///
/// Implementations are shared between the protocol thread and the search
/// worker, so they must be `Send + Sync`. They may not mutate the board.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board) -> i32;
}

/// Plain material balance using [`Piece::value`].
///
/// The fallback when no network parameter file is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let balance: i32 = Piece::ALL
            .into_iter()
            .map(|piece| {
                let white = board.pieces(Color::White, piece).popcount() as i32;
                let black = board.pieces(Color::Black, piece).popcount() as i32;
                (white - black) * piece.value()
            })
            .sum();

        match board.side_to_move() {
            Color::White => balance,
            Color::Black => -balance,
        }
    }
}
