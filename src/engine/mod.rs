//! Dispatch shell around the search.
//!
//! A single background worker receives session-tagged messages, answers
//! current requests with a move and ignores stale ones. Results from a
//! superseded session are cancelled mid-search or dropped before they reach
//! the caller.

mod dispatcher;
mod error;
mod message;
mod worker;

pub use dispatcher::{Dispatcher, WorkerConfig, WorkerStats};
pub use error::DispatchError;
pub use message::{WireMove, WorkerMessage};
pub use worker::SearchWorker;
