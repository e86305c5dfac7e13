//! Engine configuration shared by the binary and the protocol loop.

use std::path::PathBuf;

use crate::board::DEFAULT_TT_MB;

/// Default iteration depth for `go` without an explicit depth
pub const DEFAULT_DEPTH: u32 = 6;

/// Largest accepted transposition table size in MB
pub const MAX_HASH_MB: usize = 65536;

/// Startup configuration, adjusted at runtime through `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in MB
    pub hash_mb: usize,
    /// Depth used by `go` when none is given
    pub default_depth: u32,
    /// Network file for the NNUE evaluator; material-only when absent
    pub eval_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hash_mb: DEFAULT_TT_MB,
            default_depth: DEFAULT_DEPTH,
            eval_file: None,
        }
    }
}

impl EngineConfig {
    /// Set the hash size, clamped to `1..=MAX_HASH_MB`.
    #[must_use]
    pub fn with_hash_mb(mut self, mb: usize) -> Self {
        self.hash_mb = mb.clamp(1, MAX_HASH_MB);
        self
    }

    /// Set the default depth, clamped to at least 1.
    #[must_use]
    pub fn with_default_depth(mut self, depth: u32) -> Self {
        self.default_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_eval_file(mut self, path: Option<PathBuf>) -> Self {
        self.eval_file = path;
        self
    }
}
