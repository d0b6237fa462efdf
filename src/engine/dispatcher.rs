//! Worker-side message handling: session tracking, position loading and
//! move selection.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{
    best_move, best_move_for_session, greedy_move, random_move, Game, Move, SearchOptions,
    SearchResult, Strategy, DEFAULT_DEPTH,
};
use crate::sync::{SessionId, SessionToken, NO_SESSION};

use super::error::DispatchError;
use super::message::{WireMove, WorkerMessage};

/// Settings for the search worker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Depth used until an `init` carries a `searchDepth`
    pub depth: u32,
    /// Node budget and breadth cap; repetition checking is decided per request
    pub options: SearchOptions,
    /// How replies are chosen
    pub strategy: Strategy,
    /// Seed for the casual strategies; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            depth: DEFAULT_DEPTH,
            options: SearchOptions::default(),
            strategy: Strategy::default(),
            seed: None,
        }
    }
}

impl WorkerConfig {
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Counters kept by the worker
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Requests answered with a `result`
    pub searches_completed: u64,
    /// Requests dropped because their session was not the active one
    pub stale_requests: u64,
    /// Searches abandoned, or results dropped, because a newer session started
    pub searches_cancelled: u64,
    /// Requests whose position could not be loaded
    pub load_failures: u64,
    /// Nodes visited by completed searches
    pub total_nodes: u64,
}

/// Applies worker messages one at a time.
///
/// Holds the active session id and the current default depth. `init`
/// replaces both; `request` is answered only when its session is active.
pub struct Dispatcher {
    active_session: SessionId,
    depth: u32,
    config: WorkerConfig,
    rng: StdRng,
    token: Option<SessionToken>,
    stats: Arc<Mutex<WorkerStats>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: WorkerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Dispatcher {
            active_session: NO_SESSION,
            depth: config.depth,
            config,
            rng,
            token: None,
            stats: Arc::new(Mutex::new(WorkerStats::default())),
        }
    }

    /// Abandon searches as soon as `token` moves past their session.
    #[must_use]
    pub fn with_token(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Record counters into `stats` instead of a private copy.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<Mutex<WorkerStats>>) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn active_session(&self) -> SessionId {
        self.active_session
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        self.stats.lock().clone()
    }

    /// Apply one message. Returns the reply to send, if any.
    ///
    /// Stale requests yield `Ok(None)`. A `result` sent to the worker is a
    /// protocol error.
    pub fn handle(
        &mut self,
        message: WorkerMessage,
    ) -> Result<Option<WorkerMessage>, DispatchError> {
        match message {
            WorkerMessage::Init {
                session_id,
                search_depth,
            } => {
                self.active_session = session_id;
                if let Some(depth) = search_depth {
                    self.depth = depth;
                }
                log::debug!("session {} started at depth {}", session_id, self.depth);
                Ok(None)
            }
            WorkerMessage::Request {
                session_id,
                board_snapshot,
                move_history,
            } => {
                if session_id != self.active_session {
                    log::debug!(
                        "ignoring request for session {} (active {})",
                        session_id,
                        self.active_session
                    );
                    self.stats.lock().stale_requests += 1;
                    return Ok(None);
                }
                let mut game =
                    load_position(session_id, board_snapshot.as_deref(), move_history.as_deref())
                        .inspect_err(|err| {
                            if let DispatchError::Load(_) = err {
                                self.stats.lock().load_failures += 1;
                            }
                        })?;
                Ok(self.choose(session_id, &mut game))
            }
            WorkerMessage::Result { session_id, .. } => Err(DispatchError::Protocol(format!(
                "worker cannot accept a result (session {session_id})"
            ))),
        }
    }

    fn choose(&mut self, session_id: SessionId, game: &mut Game) -> Option<WorkerMessage> {
        let best: Option<Move> = match self.config.strategy {
            Strategy::Minimax => {
                let result = self.search(session_id, game);
                if result.cancelled {
                    log::debug!("search for session {} cancelled", session_id);
                    self.stats.lock().searches_cancelled += 1;
                    return None;
                }
                self.stats.lock().total_nodes += result.nodes;
                result.best_move
            }
            Strategy::Greedy => greedy_move(game, &mut self.rng),
            Strategy::Random => random_move(game, &mut self.rng),
        };

        self.stats.lock().searches_completed += 1;
        Some(WorkerMessage::Result {
            session_id,
            best_move: best.map(WireMove::from),
        })
    }

    /// Repetition draws are only scored for games loaded from a move history.
    fn search(&self, session_id: SessionId, game: &mut Game) -> SearchResult {
        let options = self
            .config
            .options
            .with_repetition_check(game.tracks_history());
        match &self.token {
            Some(token) => best_move_for_session(game, self.depth, &options, token, session_id),
            None => best_move(game, self.depth, &options),
        }
    }
}

/// Load the single position encoding of a request.
fn load_position(
    session_id: SessionId,
    board_snapshot: Option<&str>,
    move_history: Option<&str>,
) -> Result<Game, DispatchError> {
    match (board_snapshot, move_history) {
        (Some(fen), None) => Ok(Game::from_fen(fen)?),
        (None, Some(pgn)) => Ok(Game::from_pgn(pgn)?),
        (None, None) => Err(DispatchError::MissingPosition { session_id }),
        (Some(_), Some(_)) => Err(DispatchError::AmbiguousPosition { session_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn seeded(strategy: Strategy) -> Dispatcher {
        Dispatcher::new(WorkerConfig::default().with_strategy(strategy).with_seed(1))
    }

    #[test]
    fn test_init_sets_session_and_depth() {
        let mut dispatcher = seeded(Strategy::Minimax);
        assert_eq!(dispatcher.active_session(), NO_SESSION);
        assert_eq!(dispatcher.depth(), DEFAULT_DEPTH);

        let reply = dispatcher.handle(WorkerMessage::init_with_depth(5, 2)).unwrap();
        assert!(reply.is_none());
        assert_eq!(dispatcher.active_session(), 5);
        assert_eq!(dispatcher.depth(), 2);

        // Depth persists across an init that does not name one.
        dispatcher.handle(WorkerMessage::init(6)).unwrap();
        assert_eq!(dispatcher.depth(), 2);
    }

    #[test]
    fn test_request_before_init_is_stale() {
        let mut dispatcher = seeded(Strategy::Random);
        let reply = dispatcher.handle(WorkerMessage::snapshot(0, START)).unwrap();
        assert!(reply.is_none());
        assert_eq!(dispatcher.stats().stale_requests, 1);
    }

    #[test]
    fn test_missing_and_ambiguous_positions() {
        let mut dispatcher = seeded(Strategy::Random);
        dispatcher.handle(WorkerMessage::init(1)).unwrap();

        let missing = WorkerMessage::Request {
            session_id: 1,
            board_snapshot: None,
            move_history: None,
        };
        assert_eq!(
            dispatcher.handle(missing),
            Err(DispatchError::MissingPosition { session_id: 1 })
        );

        let both = WorkerMessage::Request {
            session_id: 1,
            board_snapshot: Some(START.to_string()),
            move_history: Some("1. e4".to_string()),
        };
        assert_eq!(
            dispatcher.handle(both),
            Err(DispatchError::AmbiguousPosition { session_id: 1 })
        );
    }

    #[test]
    fn test_load_failure_is_counted() {
        let mut dispatcher = seeded(Strategy::Minimax);
        dispatcher.handle(WorkerMessage::init(1)).unwrap();
        let err = dispatcher
            .handle(WorkerMessage::snapshot(1, "not a position"))
            .unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(dispatcher.stats().load_failures, 1);
    }

    #[test]
    fn test_result_into_worker_is_protocol_error() {
        let mut dispatcher = seeded(Strategy::Minimax);
        let err = dispatcher
            .handle(WorkerMessage::Result {
                session_id: NO_SESSION,
                best_move: None,
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::Protocol(_)));
    }

    #[test]
    fn test_casual_strategies_reply_with_legal_moves() {
        for strategy in [Strategy::Greedy, Strategy::Random] {
            let mut dispatcher = seeded(strategy);
            dispatcher.handle(WorkerMessage::init(2)).unwrap();
            let reply = dispatcher
                .handle(WorkerMessage::snapshot(2, START))
                .unwrap()
                .unwrap();
            let mv = reply.result_move().unwrap().unwrap();
            let game = Game::new();
            assert!(game.legal_moves().iter().any(|&m| mv.matches(m)), "{strategy}");
        }
    }

    #[test]
    fn test_superseded_token_cancels_search() {
        let token = SessionToken::new();
        let mut dispatcher = seeded(Strategy::Minimax).with_token(token.clone());
        dispatcher.handle(WorkerMessage::init(1)).unwrap();
        // The caller has already moved on to session 2.
        token.publish(2);
        let reply = dispatcher.handle(WorkerMessage::snapshot(1, START)).unwrap();
        assert!(reply.is_none());
        assert_eq!(dispatcher.stats().searches_cancelled, 1);
        assert_eq!(dispatcher.stats().searches_completed, 0);
    }

    #[test]
    fn test_history_requests_score_repetition_draws() {
        // A queen down, White can repeat the position a third time with Nb1.
        let pgn = "[FEN \"k2q4/8/8/8/8/8/8/1N5K b - - 0 1\"]\n\
                   1... Qd7 2. Nc3 Qd8 3. Nb1 Qd7 4. Nc3 Qd8";
        let config = WorkerConfig::default().with_depth(1);

        let mut dispatcher = Dispatcher::new(config.clone());
        dispatcher.handle(WorkerMessage::init(1)).unwrap();
        let reply = dispatcher
            .handle(WorkerMessage::history(1, pgn))
            .unwrap()
            .unwrap();
        assert_eq!(reply.result_move().unwrap().unwrap().to_string(), "c3b1");

        // The same position as a snapshot carries no history to repeat.
        let fen = Game::from_pgn(pgn).unwrap().to_fen();
        let mut dispatcher = Dispatcher::new(config);
        dispatcher.handle(WorkerMessage::init(1)).unwrap();
        let reply = dispatcher
            .handle(WorkerMessage::snapshot(1, fen))
            .unwrap()
            .unwrap();
        assert_ne!(reply.result_move().unwrap().unwrap().to_string(), "c3b1");
    }
}
