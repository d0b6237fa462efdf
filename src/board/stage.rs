//! Game phase classification.

use shakmaty::Color;

use super::game::Game;
use super::pst::material_value;

/// Positions before this full move are always the opening.
pub const OPENING_MOVE_LIMIT: u32 = 15;
/// Positions after this full move are always the ending.
pub const ENDING_MOVE_LIMIT: u32 = 50;
/// White material below this marks the ending (about two rooks and five pawns).
pub const ENDING_MATERIAL_THRESHOLD: i32 = 1500;

/// Discrete game phase selecting the piece-square tables and the
/// evaluation correction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStage {
    Opening,
    Middle,
    Ending,
}

impl GameStage {
    pub const ALL: [GameStage; 3] = [GameStage::Opening, GameStage::Middle, GameStage::Ending];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            GameStage::Opening => 0,
            GameStage::Middle => 1,
            GameStage::Ending => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GameStage::Opening => "opening",
            GameStage::Middle => "middle",
            GameStage::Ending => "ending",
        }
    }
}

/// Classify the phase of `game`.
///
/// Only White's material is measured between the move limits, so a position
/// and its color-flipped twin may land in different phases.
#[must_use]
pub fn classify_stage(game: &Game) -> GameStage {
    let move_number = game.move_number();
    if move_number < OPENING_MOVE_LIMIT {
        return GameStage::Opening;
    }
    if move_number > ENDING_MOVE_LIMIT {
        return GameStage::Ending;
    }
    if white_material(game) < ENDING_MATERIAL_THRESHOLD {
        GameStage::Ending
    } else {
        GameStage::Middle
    }
}

fn white_material(game: &Game) -> i32 {
    game.board()
        .iter()
        .filter(|(_, piece)| piece.color == Color::White)
        .map(|(_, piece)| material_value(piece.role))
        .sum()
}
