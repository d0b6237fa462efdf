//! Static evaluation: material plus stage-dependent piece-square tables,
//! followed by a per-stage correction. Positive scores favor White.

use shakmaty::attacks::king_attacks;
use shakmaty::{Board, Color};

use super::game::Game;
use super::pst::{signed_material, square_value};
use super::stage::GameStage;

/// Score in centipawns, positive for White. Fractional values come from the
/// middlegame trade incentive.
pub type Score = f64;

/// Only applied once one side is ahead by more than this.
const TRADE_THRESHOLD: f64 = 100.0;
const TRADE_WEIGHT: f64 = 0.001;
const KING_PAWN_WEIGHT: f64 = 10.0;

/// Evaluate `game` from White's perspective using the tables of `stage`.
///
/// Positions with insufficient mating material are dead draws and always
/// score 0.
#[must_use]
pub fn evaluate(game: &Game, stage: GameStage) -> Score {
    if game.is_insufficient_material() {
        return 0.0;
    }

    let board = game.board();
    let mut white = 0i32;
    let mut black = 0i32;
    for (sq, piece) in board.iter() {
        let value = signed_material(piece.color, piece.role)
            + square_value(stage, piece.color, piece.role, sq);
        match piece.color {
            Color::White => white += value,
            Color::Black => black += value,
        }
    }

    let mut score = f64::from(white + black);
    match stage {
        GameStage::Opening => {}
        GameStage::Middle => {
            // Side to move is behind by more than the threshold: shift the
            // score toward it in proportion to the material on the board.
            if game.white_to_move() && score < -TRADE_THRESHOLD {
                score += f64::from(white - black) * TRADE_WEIGHT;
            } else if !game.white_to_move() && score > TRADE_THRESHOLD {
                score += f64::from(black - white) * TRADE_WEIGHT;
            }
        }
        GameStage::Ending => {
            score += f64::from(king_pawn_balance(board)) * KING_PAWN_WEIGHT;
        }
    }
    score
}

/// Pawns of either color next to the White king minus those next to the
/// Black king.
fn king_pawn_balance(board: &Board) -> i32 {
    pawns_around_king(board, Color::White) - pawns_around_king(board, Color::Black)
}

fn pawns_around_king(board: &Board, color: Color) -> i32 {
    board.king_of(color).map_or(0, |king| {
        let count = (king_attacks(king) & board.pawns()).count();
        i32::try_from(count).unwrap_or(0)
    })
}
