//! NNUE network structure and evaluation.
//!
//! Parameter file layout, all little-endian `i16`:
//! feature weights `[INPUT_SIZE][HIDDEN_SIZE]`, feature bias, output weights
//! for the side to move's half, output weights for the other half, output
//! bias.

use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use super::{QA, QB, SCALE};
use crate::board::eval::Evaluator;
use crate::board::{Board, Color, Piece, Square};

/// Input feature size: 64 squares × 6 piece types × 2 colors
pub const INPUT_SIZE: usize = 768;

/// Hidden layer size (must match trained network)
pub const HIDDEN_SIZE: usize = 256;

const PARAMETER_COUNT: usize = INPUT_SIZE * HIDDEN_SIZE + 3 * HIDDEN_SIZE + 1;

/// Exact size in bytes of a parameter file
pub const FILE_SIZE: usize = PARAMETER_COUNT * 2;

#[derive(Debug, Error)]
pub enum EvalLoadError {
    #[error("failed to read network file: {0}")]
    Io(#[from] std::io::Error),
    #[error("network data truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// Hidden layer activations for both perspectives
#[derive(Clone)]
pub struct NnueAccumulator {
    pub white: [i16; HIDDEN_SIZE],
    pub black: [i16; HIDDEN_SIZE],
}

impl NnueAccumulator {
    /// Create a new accumulator initialized with biases
    #[must_use]
    pub fn new(biases: &[i16; HIDDEN_SIZE]) -> Self {
        Self {
            white: *biases,
            black: *biases,
        }
    }

    /// Add a feature (piece placed on square)
    #[inline]
    pub fn add_feature(&mut self, white_feat: usize, black_feat: usize, network: &NnueNetwork) {
        add_weights(&mut self.white, &network.feature_weights[white_feat]);
        add_weights(&mut self.black, &network.feature_weights[black_feat]);
    }

    fn perspective(&self, color: Color) -> &[i16; HIDDEN_SIZE] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[inline]
fn add_weights(acc: &mut [i16; HIDDEN_SIZE], weights: &[i16; HIDDEN_SIZE]) {
    for (a, &w) in acc.iter_mut().zip(weights) {
        *a = a.saturating_add(w);
    }
}

/// Squared clipped ReLU followed by a dot product with the output weights.
#[inline]
fn screlu_dot(acc: &[i16; HIDDEN_SIZE], weights: &[i16; HIDDEN_SIZE]) -> i64 {
    acc.iter()
        .zip(weights)
        .map(|(&a, &w)| {
            let clamped = i64::from(a).clamp(0, i64::from(QA));
            clamped * clamped * i64::from(w)
        })
        .sum()
}

/// Feature index of a piece as seen from `perspective`.
///
/// Black's view flips the board vertically and swaps colors, so "own
/// pieces" always occupy the first 384 inputs.
#[inline]
#[must_use]
pub fn feature_index(piece: Piece, color: Color, sq: Square, perspective: Color) -> usize {
    let (oriented_sq, own) = match perspective {
        Color::White => (sq, color == Color::White),
        Color::Black => (sq.flip_vertical(), color == Color::Black),
    };
    usize::from(!own) * 384 + piece.index() * 64 + oriented_sq.index()
}

/// NNUE network weights
pub struct NnueNetwork {
    /// Feature transformer weights, one row per input feature
    feature_weights: Vec<[i16; HIDDEN_SIZE]>,
    feature_bias: [i16; HIDDEN_SIZE],
    output_weights_us: [i16; HIDDEN_SIZE],
    output_weights_them: [i16; HIDDEN_SIZE],
    output_bias: i16,
}

impl NnueNetwork {
    /// Load network from a parameter file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EvalLoadError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let network = Self::from_bytes(&data)?;
        info!("loaded NNUE network from {}", path.display());
        Ok(network)
    }

    /// Load network from an in-memory parameter file
    pub fn from_bytes(data: &[u8]) -> Result<Self, EvalLoadError> {
        if data.len() < FILE_SIZE {
            return Err(EvalLoadError::Truncated {
                expected: FILE_SIZE,
                found: data.len(),
            });
        }
        if data.len() > FILE_SIZE {
            warn!(
                "ignoring {} trailing bytes after network parameters",
                data.len() - FILE_SIZE
            );
        }

        let mut values = data[..FILE_SIZE]
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]));
        let mut fill = |dst: &mut [i16]| {
            for (slot, value) in dst.iter_mut().zip(values.by_ref()) {
                *slot = value;
            }
        };

        let mut feature_weights = vec![[0i16; HIDDEN_SIZE]; INPUT_SIZE];
        for row in &mut feature_weights {
            fill(&mut row[..]);
        }
        let mut feature_bias = [0i16; HIDDEN_SIZE];
        fill(&mut feature_bias[..]);
        let mut output_weights_us = [0i16; HIDDEN_SIZE];
        fill(&mut output_weights_us[..]);
        let mut output_weights_them = [0i16; HIDDEN_SIZE];
        fill(&mut output_weights_them[..]);
        let mut output_bias = [0i16; 1];
        fill(&mut output_bias[..]);

        Ok(Self {
            feature_weights,
            feature_bias,
            output_weights_us,
            output_weights_them,
            output_bias: output_bias[0],
        })
    }

    /// Accumulator for `board`, built from scratch
    #[must_use]
    pub fn accumulate(&self, board: &Board) -> NnueAccumulator {
        let mut acc = NnueAccumulator::new(&self.feature_bias);
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in board.pieces(color, piece).iter() {
                    acc.add_feature(
                        feature_index(piece, color, sq, Color::White),
                        feature_index(piece, color, sq, Color::Black),
                        self,
                    );
                }
            }
        }
        acc
    }

    /// Evaluate an accumulator in centipawns for `side_to_move`
    #[must_use]
    pub fn evaluate_accumulator(&self, acc: &NnueAccumulator, side_to_move: Color) -> i32 {
        let us = screlu_dot(acc.perspective(side_to_move), &self.output_weights_us);
        let them = screlu_dot(
            acc.perspective(side_to_move.opponent()),
            &self.output_weights_them,
        );
        let output = us + them + i64::from(self.output_bias) * i64::from(QA);
        let scaled = output * i64::from(SCALE) / i64::from(QA * QA * QB);
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl Evaluator for NnueNetwork {
    fn evaluate(&self, board: &Board) -> i32 {
        let acc = self.accumulate(board);
        self.evaluate_accumulator(&acc, board.side_to_move())
    }
}
