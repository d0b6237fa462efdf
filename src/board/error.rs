//! Error types for loading positions and applying moves.

use std::fmt;

/// Error type for board snapshot and move-history loading failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// FEN string could not be parsed
    InvalidFen { fen: String, reason: String },
    /// FEN parsed but describes an impossible position
    InvalidPosition { fen: String, reason: String },
    /// Token in the move history is not syntactically valid SAN
    InvalidSan { san: String, ply: usize },
    /// SAN does not match exactly one legal move
    IllegalSan { san: String, ply: usize },
    /// A `{` comment or `(` variation was never closed
    Unterminated { what: &'static str },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidFen { fen, reason } => {
                write!(f, "Invalid FEN '{fen}': {reason}")
            }
            LoadError::InvalidPosition { fen, reason } => {
                write!(f, "Illegal position '{fen}': {reason}")
            }
            LoadError::InvalidSan { san, ply } => {
                write!(f, "Invalid SAN '{san}' at ply {ply}")
            }
            LoadError::IllegalSan { san, ply } => {
                write!(f, "No unique legal move for '{san}' at ply {ply}")
            }
            LoadError::Unterminated { what } => {
                write!(f, "Unterminated {what} in move history")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Error type for externally supplied moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Move is not legal in the current position
    Illegal { notation: String },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Illegal { notation } => write!(f, "Illegal move '{notation}'"),
        }
    }
}

impl std::error::Error for MoveError {}
