//! NNUE (Efficiently Updatable Neural Network) evaluation.
//!
//! Architecture: (768 -> 256) x 2 perspectives -> 1 with `SCReLU`
//! activation. Both perspective accumulators are refreshed from the board
//! on every call.

mod network;

pub use network::{EvalLoadError, NnueAccumulator, NnueNetwork, HIDDEN_SIZE, INPUT_SIZE};

/// Weight quantization factor for feature weights
pub const QA: i32 = 255;

/// Output weight quantization factor
pub const QB: i32 = 64;

/// Evaluation scale factor
pub const SCALE: i32 = 400;
