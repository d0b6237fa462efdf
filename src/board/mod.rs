//! Chess position handling and move search.
//!
//! Rules (move generation, check detection, notation) come from `shakmaty`;
//! this module adds an undo stack with repetition counts, the stage-aware
//! evaluator and the minimax search on top.
//!
//! # Example
//! ```
//! use chess_bot::board::{best_move, Game, SearchOptions};
//!
//! let mut game = Game::new();
//! let result = best_move(&mut game, 2, &SearchOptions::default());
//! println!("Best opening move: {}", result.best_move.unwrap());
//! ```

mod error;
mod eval;
mod game;
mod pgn;
mod pst;
pub mod search;
mod stage;
mod types;

#[cfg(test)]
mod tests;

pub use error::{LoadError, MoveError};
pub use eval::{evaluate, Score};
pub use game::Game;
pub use pst::{material_value, square_value, Table};
pub use stage::{classify_stage, GameStage};
pub use types::Move;

pub use search::casual::{greedy_move, random_move, Strategy};
pub use search::{
    best_move, best_move_for_session, SearchContext, SearchOptions, SearchResult,
    DEFAULT_BREADTH_CAP, DEFAULT_DEPTH, DEFAULT_NODE_BUDGET, MATE_SCORE,
};

pub use shakmaty::{Color, Role, Square};
