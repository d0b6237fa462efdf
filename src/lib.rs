pub mod board;
pub mod engine;
pub mod sync;

pub use board::{best_move, Game, Move, SearchOptions, SearchResult};
pub use engine::{SearchWorker, WorkerConfig, WorkerMessage};
pub use sync::{SessionId, SessionToken, NO_SESSION};
