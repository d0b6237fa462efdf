//! Casual move pickers that do not search: a uniformly random mover and a
//! greedy mover that grabs mates, checks and captures.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::game::Game;
use crate::board::types::Move;

/// How the worker chooses its reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Alpha-beta search over the evaluator
    #[default]
    Minimax,
    /// Mate, else check, else capture, else anything
    Greedy,
    /// Any legal move
    Random,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Minimax => "minimax",
            Strategy::Greedy => "greedy",
            Strategy::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "greedy" => Ok(Strategy::Greedy),
            "random" => Ok(Strategy::Random),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// A uniformly random legal move, or `None` if there is none.
pub fn random_move<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Option<Move> {
    game.legal_moves().choose(rng).map(|&mv| Move::from(mv))
}

/// A random move among the most forcing tier available: mating moves, then
/// checking moves, then ordinary captures, then all legal moves.
pub fn greedy_move<R: Rng + ?Sized>(game: &mut Game, rng: &mut R) -> Option<Move> {
    let moves = game.legal_moves();

    let mut mates = Vec::new();
    let mut checks = Vec::new();
    for &mv in &moves {
        game.push(mv);
        if game.is_checkmate() {
            mates.push(mv);
        } else if game.is_check() {
            checks.push(mv);
        }
        game.pop();
    }
    // En passant does not count as a capture here.
    let captures: Vec<_> = moves
        .iter()
        .copied()
        .filter(|mv| mv.is_capture() && !mv.is_en_passant())
        .collect();

    let tier: &[shakmaty::Move] = if !mates.is_empty() {
        &mates
    } else if !checks.is_empty() {
        &checks
    } else if !captures.is_empty() {
        &captures
    } else {
        &moves
    };
    tier.choose(rng).map(|&mv| Move::from(mv))
}
