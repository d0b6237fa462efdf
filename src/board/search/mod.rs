//! Move search: minimax with alpha-beta pruning over the evaluator.
//!
//! Features:
//! - Fixed-depth minimax with alpha-beta cutoffs
//! - Mate scores that prefer the shortest mate
//! - Per-node breadth cap and a global node budget
//! - Optional threefold-repetition draw detection
//! - Cooperative cancellation through a [`SessionToken`]
//! - Casual move pickers (random, greedy) in [`casual`]

pub mod casual;
mod constants;
mod minimax;

use crate::board::eval::Score;
use crate::board::game::Game;
use crate::board::stage::{classify_stage, GameStage};
use crate::board::types::Move;
use crate::sync::{SessionId, SessionToken};

pub use constants::{
    DEFAULT_BREADTH_CAP, DEFAULT_DEPTH, DEFAULT_NODE_BUDGET, DRAW_SCORE, MATE_SCORE,
};
pub use minimax::{Cancellation, SearchContext};

/// Limits and switches for one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Score threefold repetitions as draws. Only meaningful for games loaded
    /// from a move history.
    pub repetition_check: bool,
    /// Nodes visited before every further node scores as a draw
    pub node_budget: u64,
    /// Moves considered per node, taken in generation order
    pub breadth_cap: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            repetition_check: false,
            node_budget: DEFAULT_NODE_BUDGET,
            breadth_cap: DEFAULT_BREADTH_CAP,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn with_repetition_check(mut self, enabled: bool) -> Self {
        self.repetition_check = enabled;
        self
    }

    #[must_use]
    pub fn with_node_budget(mut self, nodes: u64) -> Self {
        self.node_budget = nodes;
        self
    }

    /// A cap of zero is raised to one so every node keeps a move.
    #[must_use]
    pub fn with_breadth_cap(mut self, moves: usize) -> Self {
        self.breadth_cap = moves.max(1);
        self
    }
}

/// Result of a search
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// The best move found, `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score of the best move from White's perspective
    pub score: Score,
    /// Nodes visited below the root
    pub nodes: u64,
    /// Whether the node budget ran out during the search
    pub budget_exhausted: bool,
    /// Whether the search was abandoned because its session was superseded
    pub cancelled: bool,
    /// Stage used for every evaluation of this search
    pub stage: GameStage,
}

/// Find the best move for the side to move in `game`, searching `depth`
/// plies (a depth of 0 is treated as 1).
///
/// `game` is returned to its original state.
pub fn best_move(game: &mut Game, depth: u32, options: &SearchOptions) -> SearchResult {
    search_root(game, depth, options, None)
}

/// Like [`best_move`], but gives up as soon as `token` no longer names
/// `session`. A cancelled result carries `cancelled: true` and should be
/// discarded.
pub fn best_move_for_session(
    game: &mut Game,
    depth: u32,
    options: &SearchOptions,
    token: &SessionToken,
    session: SessionId,
) -> SearchResult {
    search_root(game, depth, options, Some(Cancellation { token, session }))
}

fn search_root(
    game: &mut Game,
    depth: u32,
    options: &SearchOptions,
    cancellation: Option<Cancellation<'_>>,
) -> SearchResult {
    let depth = depth.max(1);
    let white = game.white_to_move();
    let stage = classify_stage(game);
    let mut ctx = SearchContext::new(*options, stage);
    if let Some(cancellation) = cancellation {
        ctx = ctx.with_cancellation(cancellation);
    }

    let moves = game.legal_moves();
    let mut best = moves.first().map(|&mv| Move::from(mv));
    let mut best_score = if white {
        Score::NEG_INFINITY
    } else {
        Score::INFINITY
    };

    for &mv in moves.iter().take(options.breadth_cap) {
        game.push(mv);
        let score = ctx.minimax(
            game,
            depth - 1,
            Score::NEG_INFINITY,
            Score::INFINITY,
            !white,
        );
        game.pop();
        if ctx.cancelled {
            break;
        }
        let improves = if white {
            score > best_score
        } else {
            score < best_score
        };
        if improves {
            best_score = score;
            best = Some(Move::from(mv));
        }
    }

    let score = if best_score.is_finite() {
        best_score
    } else {
        DRAW_SCORE
    };
    log::debug!(
        "search depth {} stage {}: best {} score {} nodes {}{}{}",
        depth,
        stage.name(),
        best.map_or_else(|| "(none)".to_string(), |m| m.to_string()),
        score,
        ctx.nodes,
        if ctx.budget_exhausted { " (budget exhausted)" } else { "" },
        if ctx.cancelled { " (cancelled)" } else { "" },
    );

    SearchResult {
        best_move: best,
        score,
        nodes: ctx.nodes,
        budget_exhausted: ctx.budget_exhausted,
        cancelled: ctx.cancelled,
        stage,
    }
}
