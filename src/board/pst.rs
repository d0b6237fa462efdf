//! Material values and piece-square tables.
//!
//! Tables are written from White's point of view in display order: row 0 is
//! the eighth rank, row 7 the first rank, columns run from the a-file to the
//! h-file. Black's table for every piece and stage is White's table with the
//! rows reversed and every value negated, so a lookup always yields a value
//! already signed for the piece's owner.

use once_cell::sync::Lazy;
use shakmaty::{Color, Role, Square};

use super::stage::GameStage;

/// An 8x8 grid of positional bonuses, row 0 = rank 8.
pub type Table = [[i32; 8]; 8];

// ============================================================================
// MATERIAL
// ============================================================================

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
/// The king is never captured, so it carries no material.
pub const KING_VALUE: i32 = 0;

#[must_use]
pub const fn material_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

/// Material value signed for the owner: positive for White, negative for Black.
#[must_use]
pub fn signed_material(color: Color, role: Role) -> i32 {
    color.fold_wb(material_value(role), -material_value(role))
}

// ============================================================================
// OPENING / MIDDLEGAME TABLES (White)
// ============================================================================

const PAWN_OPENING: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_OPENING: Table = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP_OPENING: Table = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_OPENING: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

const QUEEN_OPENING: Table = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING_OPENING: Table = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

// ============================================================================
// ENDGAME TABLES (White)
// ============================================================================

const PAWN_ENDING: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [30, 30, 30, 30, 30, 30, 30, 30],
    [25, 25, 25, 25, 25, 25, 25, 25],
    [10, 10, 10, 10, 10, 10, 10, 10],
    [5, 5, 5, 5, 5, 5, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_ENDING: Table = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 5, 5, 5, 5, -20, -40],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 5, 5, 5, 5, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP_ENDING: Table = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 5, 10, 10, 10, 10, 5, -10],
    [-10, 5, 10, 10, 10, 10, 5, -10],
    [-10, 5, 10, 10, 10, 10, 5, -10],
    [-10, 5, 10, 10, 10, 10, 5, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_ENDING: Table = [
    [-5, -5, -5, -5, -5, -5, -5, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, -5, -5, -5, -5, -5, -5, -5],
];

const QUEEN_ENDING: Table = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 5, 5, 5, 5, 5, 5, -10],
    [-5, 5, 5, 5, 5, 5, 5, -5],
    [-5, 5, 5, 5, 5, 5, 5, -5],
    [-10, 5, 5, 5, 5, 5, 5, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING_ENDING: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [8, 8, 10, 11, 11, 10, 8, 8],
    [6, 6, 7, 9, 9, 7, 6, 6],
    [4, 4, 5, 7, 7, 5, 4, 4],
    [2, 2, 3, 5, 5, 3, 2, 2],
    [0, 2, 2, 3, 3, 2, 2, 0],
    [-5, -2, -2, 0, 0, -2, -2, -5],
    [-5, -5, -5, -5, -5, -5, -5, -5],
];

/// White tables for one stage, indexed by `Role as usize - 1`.
const OPENING_WHITE: [Table; 6] = [
    PAWN_OPENING,
    KNIGHT_OPENING,
    BISHOP_OPENING,
    ROOK_OPENING,
    QUEEN_OPENING,
    KING_OPENING,
];

const ENDING_WHITE: [Table; 6] = [
    PAWN_ENDING,
    KNIGHT_ENDING,
    BISHOP_ENDING,
    ROOK_ENDING,
    QUEEN_ENDING,
    KING_ENDING,
];

// ============================================================================
// TABLE SET
// ============================================================================

/// Tables for both colors of one stage: `[color][role]`, White first.
type StageTables = [[Table; 6]; 2];

/// Rows reversed and values negated.
#[must_use]
pub fn mirror(table: &Table) -> Table {
    let mut out = [[0; 8]; 8];
    for (row, values) in table.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            out[7 - row][col] = -value;
        }
    }
    out
}

fn both_colors(white: &[Table; 6]) -> StageTables {
    let mut black = [[[0; 8]; 8]; 6];
    for (slot, table) in black.iter_mut().zip(white) {
        *slot = mirror(table);
    }
    [*white, black]
}

/// All tables, built on first use and never modified: `[stage][color][role]`.
/// The middlegame reuses the opening tables.
static TABLES: Lazy<[StageTables; 3]> = Lazy::new(|| {
    [
        both_colors(&OPENING_WHITE),
        both_colors(&OPENING_WHITE),
        both_colors(&ENDING_WHITE),
    ]
});

const fn role_index(role: Role) -> usize {
    role as usize - 1
}

const fn color_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// The table for one piece type, color and stage.
#[must_use]
pub fn table(stage: GameStage, color: Color, role: Role) -> &'static Table {
    &TABLES[stage.index()][color_index(color)][role_index(role)]
}

/// Positional value of a piece on `sq`, already signed for its owner.
#[inline]
#[must_use]
pub fn square_value(stage: GameStage, color: Color, role: Role, sq: Square) -> i32 {
    let row = 7 - sq.rank().to_usize();
    let col = sq.file().to_usize();
    table(stage, color, role)[row][col]
}
