//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `game.rs` - Loading, push/pop and externally supplied moves
//! - `draw.rs` - Repetition, stalemate and insufficient material
//! - `search.rs` - Minimax scoring and pruning
//! - `proptest.rs` - Property-based tests

mod game;
