//! Search constants and defaults.

// ============================================================================
// SCORES
// ============================================================================

/// Base score for a checkmate. Remaining depth is added on top so that
/// faster mates score further from zero.
pub const MATE_SCORE: f64 = 20000.0;

/// Returned for draws (stalemate, threefold repetition) and for nodes past
/// the node budget or after cancellation.
pub const DRAW_SCORE: f64 = 0.0;

// ============================================================================
// LIMITS
// ============================================================================

/// Search depth in plies when the caller does not choose one.
pub const DEFAULT_DEPTH: u32 = 3;

/// Nodes visited before every further node scores as a draw.
pub const DEFAULT_NODE_BUDGET: u64 = 30_000;

/// Moves considered per node, in the rules engine's order.
pub const DEFAULT_BREADTH_CAP: usize = 50;
