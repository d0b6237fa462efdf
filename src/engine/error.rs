//! Error type for the dispatch shell.

use std::fmt;

use crate::board::LoadError;
use crate::sync::SessionId;

/// Error type for message handling in the search worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Message could not be decoded, has an unknown kind, or is a kind the
    /// worker never accepts
    Protocol(String),
    /// Request carried neither a board snapshot nor a move history
    MissingPosition { session_id: SessionId },
    /// Request carried both a board snapshot and a move history
    AmbiguousPosition { session_id: SessionId },
    /// Position in a current request could not be loaded
    Load(LoadError),
    /// The worker thread is gone
    Disconnected,
}

impl DispatchError {
    /// Whether the worker stops after this error. Only load failures are
    /// survivable: they abort the one request that caused them.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DispatchError::Load(_))
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            DispatchError::MissingPosition { session_id } => {
                write!(f, "Request for session {session_id} has no position")
            }
            DispatchError::AmbiguousPosition { session_id } => write!(
                f,
                "Request for session {session_id} has both a board snapshot and a move history"
            ),
            DispatchError::Load(err) => write!(f, "Failed to load position: {err}"),
            DispatchError::Disconnected => write!(f, "Search worker disconnected"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for DispatchError {
    fn from(err: LoadError) -> Self {
        DispatchError::Load(err)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Protocol(err.to_string())
    }
}
