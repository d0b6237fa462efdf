//! Synchronization primitives shared between the caller and the search worker.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Identifies a search lineage. Only results tagged with the active id are
/// meaningful.
pub type SessionId = i64;

/// Session id before any `init` has been seen.
pub const NO_SESSION: SessionId = -1;

/// The newest session id, shared between the handle that posts messages and
/// the search that may be running on the worker thread.
///
/// The handle publishes a new id the moment it posts an `init`; a running
/// search polls [`SessionToken::is_current`] between nodes and gives up as
/// soon as its own id has been superseded.
#[derive(Clone, Debug)]
pub struct SessionToken(Arc<AtomicI64>);

impl SessionToken {
    /// Create a token with no session.
    #[must_use]
    pub fn new() -> Self {
        SessionToken(Arc::new(AtomicI64::new(NO_SESSION)))
    }

    /// The most recently published session id.
    #[inline]
    #[must_use]
    pub fn current(&self) -> SessionId {
        self.0.load(Ordering::Acquire)
    }

    /// Whether `id` is still the newest session.
    #[inline]
    #[must_use]
    pub fn is_current(&self, id: SessionId) -> bool {
        self.current() == id
    }

    /// Publish a new session id.
    #[inline]
    pub fn publish(&self, id: SessionId) {
        self.0.store(id, Ordering::Release);
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}
