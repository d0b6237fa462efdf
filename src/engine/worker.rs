//! Background search worker.
//!
//! One thread owns a [`Dispatcher`] and processes messages strictly in the
//! order they were posted. The caller never blocks on a search: it posts
//! messages through [`SearchWorker`] and receives replies through a callback
//! that runs on the worker thread.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::sync::{SessionId, SessionToken};

use super::dispatcher::{Dispatcher, WorkerConfig, WorkerStats};
use super::error::DispatchError;
use super::message::WorkerMessage;

/// Worker thread stack size (32 MB)
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Handle to the background search worker.
///
/// Dropping the handle closes the channel and waits for the worker to finish
/// the message it is processing.
pub struct SearchWorker {
    sender: Option<Sender<WorkerMessage>>,
    token: SessionToken,
    stats: Arc<Mutex<WorkerStats>>,
    handle: Option<JoinHandle<Result<(), DispatchError>>>,
}

impl SearchWorker {
    /// Start the worker thread.
    ///
    /// `on_result` receives every `result` whose session is still current
    /// when the search finishes.
    pub fn spawn<F>(config: WorkerConfig, on_result: F) -> io::Result<Self>
    where
        F: FnMut(WorkerMessage) + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let token = SessionToken::new();
        let stats = Arc::new(Mutex::new(WorkerStats::default()));

        let dispatcher = Dispatcher::new(config)
            .with_token(token.clone())
            .with_stats(Arc::clone(&stats));
        let worker_token = token.clone();
        let worker_stats = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || {
                run(receiver, dispatcher, &worker_token, &worker_stats, on_result)
            })?;

        Ok(SearchWorker {
            sender: Some(sender),
            token,
            stats,
            handle: Some(handle),
        })
    }

    /// Post a message. An `init` takes effect for cancellation immediately,
    /// before the worker has dequeued it.
    pub fn post(&self, message: WorkerMessage) -> Result<(), DispatchError> {
        let sender = self.sender.as_ref().ok_or(DispatchError::Disconnected)?;
        if let WorkerMessage::Init { session_id, .. } = &message {
            self.token.publish(*session_id);
        }
        sender
            .send(message)
            .map_err(|_| DispatchError::Disconnected)
    }

    /// Start a new session, optionally changing the default depth.
    pub fn init(&self, session_id: SessionId, depth: Option<u32>) -> Result<(), DispatchError> {
        self.post(WorkerMessage::Init {
            session_id,
            search_depth: depth,
        })
    }

    /// Ask for a move in a FEN board snapshot.
    pub fn request_snapshot(&self, session_id: SessionId, fen: &str) -> Result<(), DispatchError> {
        self.post(WorkerMessage::snapshot(session_id, fen))
    }

    /// Ask for a move after a PGN move history.
    pub fn request_history(&self, session_id: SessionId, pgn: &str) -> Result<(), DispatchError> {
        self.post(WorkerMessage::history(session_id, pgn))
    }

    /// The newest session posted through this handle.
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.token.current()
    }

    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        self.stats.lock().clone()
    }

    /// Close the channel and wait for queued messages to drain.
    ///
    /// Returns the fatal error that stopped the worker early, if any.
    pub fn shutdown(mut self) -> Result<(), DispatchError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<(), DispatchError> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| DispatchError::Disconnected)?,
            None => Ok(()),
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            log::debug!("search worker stopped: {err}");
        }
    }
}

fn run<F>(
    receiver: Receiver<WorkerMessage>,
    mut dispatcher: Dispatcher,
    token: &SessionToken,
    stats: &Mutex<WorkerStats>,
    mut on_result: F,
) -> Result<(), DispatchError>
where
    F: FnMut(WorkerMessage),
{
    for message in receiver {
        let kind = message.kind();
        match dispatcher.handle(message) {
            Ok(Some(reply)) => {
                let session_id = reply.session_id();
                if token.is_current(session_id) {
                    on_result(reply);
                } else {
                    log::debug!("dropping result for superseded session {session_id}");
                    stats.lock().searches_cancelled += 1;
                }
            }
            Ok(None) => {}
            Err(err) if err.is_fatal() => {
                log::error!("{kind} message: {err}");
                return Err(err);
            }
            Err(err) => log::warn!("{kind} message: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Duration;

    use crate::board::Strategy;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn collecting_worker(config: WorkerConfig) -> (SearchWorker, Receiver<WorkerMessage>) {
        let (tx, rx) = mpsc::channel();
        let worker = SearchWorker::spawn(config, move |msg| {
            let _ = tx.send(msg);
        })
        .unwrap();
        (worker, rx)
    }

    #[test]
    fn test_init_publishes_session_immediately() {
        let (worker, _rx) = collecting_worker(WorkerConfig::default());
        worker.init(12, None).unwrap();
        assert_eq!(worker.session(), 12);
    }

    #[test]
    fn test_result_for_current_session() {
        let config = WorkerConfig::default().with_depth(1);
        let (worker, rx) = collecting_worker(config);
        worker.init(1, None).unwrap();
        worker.request_snapshot(1, START).unwrap();

        let reply = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert_eq!(reply.session_id(), 1);
        assert!(reply.result_move().is_some());

        worker.shutdown().unwrap();
    }

    #[test]
    fn test_fatal_error_stops_worker() {
        let config = WorkerConfig::default().with_strategy(Strategy::Random);
        let (worker, rx) = collecting_worker(config);
        worker
            .post(WorkerMessage::Result {
                session_id: 0,
                best_move: None,
            })
            .unwrap();
        let err = worker.shutdown().unwrap_err();
        assert!(matches!(err, DispatchError::Protocol(_)));
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn test_load_failure_keeps_worker_alive() {
        let config = WorkerConfig::default().with_strategy(Strategy::Random).with_seed(4);
        let (worker, rx) = collecting_worker(config);
        worker.init(3, None).unwrap();
        worker.request_snapshot(3, "garbage").unwrap();
        worker.request_snapshot(3, START).unwrap();

        let reply = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert_eq!(reply.session_id(), 3);
        assert_eq!(worker.stats().load_failures, 1);
        worker.shutdown().unwrap();
    }
}
