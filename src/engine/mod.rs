//! Engine controller for managing search and game state.
//!
//! Owns the current position and the shared search session, and runs
//! searches on a worker thread so the protocol loop can keep reading input
//! and deliver `stop`.

mod controller;

pub use controller::{EngineController, SearchJob, SearchParams};
