//! Game state: a `shakmaty` position plus an undo stack and repetition counts.

use std::collections::HashMap;

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::zobrist::Zobrist64;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, MoveList, Position, Square};

use super::error::{LoadError, MoveError};
use super::pgn::parse_move_history;
use super::types::Move;

#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.counts.insert(hash, next);
        next
    }

    pub(crate) fn decrement(&mut self, hash: u64) {
        match self.get(hash) {
            0 | 1 => {
                self.counts.remove(&hash);
            }
            n => {
                self.counts.insert(hash, n - 1);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Undo {
    previous: Chess,
    previous_hash: u64,
}

/// A position together with the history needed to undo moves and detect
/// repetitions.
///
/// Moves are applied with [`Game::push`] and taken back with [`Game::pop`];
/// `pop` always unwinds the most recent `push`.
#[derive(Clone, Debug)]
pub struct Game {
    position: Chess,
    hash: u64,
    undo_stack: Vec<Undo>,
    repetitions: RepetitionTable,
    from_history: bool,
}

fn zobrist(position: &Chess) -> u64 {
    position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}

impl Game {
    /// Standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Game::from_position(Chess::default())
    }

    fn from_position(position: Chess) -> Self {
        let hash = zobrist(&position);
        let mut repetitions = RepetitionTable::default();
        repetitions.increment(hash);
        Game {
            position,
            hash,
            undo_stack: Vec::new(),
            repetitions,
            from_history: false,
        }
    }

    /// Load a board snapshot in FEN.
    pub fn from_fen(fen: &str) -> Result<Self, LoadError> {
        let fen = fen.trim();
        let parsed: Fen = fen.parse().map_err(|e: shakmaty::fen::ParseFenError| {
            LoadError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            }
        })?;
        let position: Chess =
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|e| LoadError::InvalidPosition {
                    fen: fen.to_string(),
                    reason: e.to_string(),
                })?;
        Ok(Game::from_position(position))
    }

    /// Load a full move history in PGN. Repetition detection is only
    /// meaningful for games built this way.
    pub fn from_pgn(pgn: &str) -> Result<Self, LoadError> {
        let history = parse_move_history(pgn)?;
        let mut game = match history.fen.as_deref() {
            Some(fen) => Game::from_fen(fen)?,
            None => Game::new(),
        };
        for (ply, san) in history.sans.iter().enumerate() {
            game.play_san(san, ply)?;
        }
        game.from_history = true;
        Ok(game)
    }

    fn play_san(&mut self, text: &str, ply: usize) -> Result<(), LoadError> {
        let san: San = text.parse().map_err(|_| LoadError::InvalidSan {
            san: text.to_string(),
            ply,
        })?;
        let mv = san
            .to_move(&self.position)
            .map_err(|_| LoadError::IllegalSan {
                san: text.to_string(),
                ply,
            })?;
        self.push(mv);
        Ok(())
    }

    /// Apply an externally supplied move after checking it is legal.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        let engine_move = mv
            .to_uci()
            .to_move(&self.position)
            .map_err(|_| MoveError::Illegal {
                notation: mv.to_string(),
            })?;
        self.push(engine_move);
        Ok(())
    }

    /// Apply a move produced by [`Game::legal_moves`].
    pub fn push(&mut self, mv: shakmaty::Move) {
        let previous = self.position.clone();
        self.position.play_unchecked(mv);
        let hash = zobrist(&self.position);
        self.repetitions.increment(hash);
        self.undo_stack.push(Undo {
            previous,
            previous_hash: self.hash,
        });
        self.hash = hash;
    }

    /// Undo the most recent [`Game::push`]. Returns `false` if there was
    /// nothing to undo.
    pub fn pop(&mut self) -> bool {
        let Some(undo) = self.undo_stack.pop() else {
            return false;
        };
        self.repetitions.decrement(self.hash);
        self.position = undo.previous;
        self.hash = undo.previous_hash;
        true
    }

    /// Legal moves in the rules engine's native order.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves()
    }

    /// Legal moves starting on `from`.
    #[must_use]
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = self.position.legal_moves();
        moves.retain(|m| m.from() == Some(from));
        moves
    }

    #[must_use]
    pub fn position(&self) -> &Chess {
        &self.position
    }

    #[must_use]
    pub fn board(&self) -> &shakmaty::Board {
        self.position.board()
    }

    #[must_use]
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.position.turn() == Color::White
    }

    /// Full move number, starting at 1 and incremented after Black moves.
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of moves currently on the undo stack.
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Whether the game was loaded from a move history.
    #[must_use]
    pub fn tracks_history(&self) -> bool {
        self.from_history
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// The current position has occurred at least three times.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions.get(self.hash) >= 3
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
