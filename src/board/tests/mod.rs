//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move-count verification against known positions
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `edge_cases.rs` - Special positions and edge cases
//! - `proptest.rs` - Property-based tests
//! - `search.rs` - Search scoring and session behaviour

mod proptest;
mod search;
