//! Depth-limited minimax with alpha-beta pruning.

use crate::board::eval::{evaluate, Score};
use crate::board::game::Game;
use crate::board::stage::GameStage;
use crate::sync::{SessionId, SessionToken};

use super::constants::{DRAW_SCORE, MATE_SCORE};
use super::SearchOptions;

/// A running search abandons its work when its session is superseded.
#[derive(Clone, Copy, Debug)]
pub struct Cancellation<'a> {
    pub token: &'a SessionToken,
    pub session: SessionId,
}

impl Cancellation<'_> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        !self.token.is_current(self.session)
    }
}

/// State owned by one top-level search. Nothing here outlives the call, so
/// independent searches never share a stage or a node counter.
#[derive(Debug)]
pub struct SearchContext<'a> {
    pub options: SearchOptions,
    pub stage: GameStage,
    pub nodes: u64,
    pub budget_exhausted: bool,
    pub cancelled: bool,
    cancellation: Option<Cancellation<'a>>,
}

impl<'a> SearchContext<'a> {
    #[must_use]
    pub fn new(options: SearchOptions, stage: GameStage) -> Self {
        SearchContext {
            options,
            stage,
            nodes: 0,
            budget_exhausted: false,
            cancelled: false,
            cancellation: None,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation<'a>) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Score `game` by searching `depth` more plies. `maximizing` is true
    /// when White is the side to move at this node.
    pub fn minimax(
        &mut self,
        game: &mut Game,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.nodes += 1;
        if self.nodes > self.options.node_budget {
            self.budget_exhausted = true;
            return DRAW_SCORE;
        }
        if self.cancelled || self.cancellation.is_some_and(|c| c.is_cancelled()) {
            self.cancelled = true;
            return DRAW_SCORE;
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            if game.is_check() {
                let mate = MATE_SCORE + f64::from(depth);
                return if game.white_to_move() { -mate } else { mate };
            }
            return DRAW_SCORE;
        }

        if self.options.repetition_check && game.is_threefold_repetition() {
            return DRAW_SCORE;
        }

        if depth == 0 {
            return evaluate(game, self.stage);
        }

        let candidates = moves.iter().take(self.options.breadth_cap);
        if maximizing {
            let mut best = Score::NEG_INFINITY;
            for &mv in candidates {
                game.push(mv);
                best = best.max(self.minimax(game, depth - 1, alpha, beta, false));
                game.pop();
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = Score::INFINITY;
            for &mv in candidates {
                game.push(mv);
                best = best.min(self.minimax(game, depth - 1, alpha, beta, true));
                game.pop();
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
