//! Magic-bitboard chess move generation and alpha-beta search.
//!
//! The [`board`] module holds the position, move generation, make/unmake
//! and search; [`uci`] and [`engine`] wrap them in a line protocol.

pub mod board;
pub mod config;
pub mod engine;
pub mod tt;
pub mod uci;
mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use config::EngineConfig;
pub use engine::EngineController;
pub use tt::TranspositionTable;

/// Build the attack tables up front instead of on first use.
pub fn init() {
    board::attack_tables::init_attack_tables();
}
