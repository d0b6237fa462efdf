//! Move representation shared by the search and the wire protocol.

use std::fmt;
use std::str::FromStr;

use shakmaty::uci::UciMove;
use shakmaty::{CastlingSide, Role, Square};

use super::error::MoveError;

/// A move as seen from outside the rules engine: origin, destination and an
/// optional promotion piece. Castling is the king's two-square step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl Move {
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Role>) -> Self {
        Move {
            from,
            to,
            promotion,
        }
    }

    #[must_use]
    pub const fn to_uci(self) -> UciMove {
        UciMove::Normal {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Whether this move is the standard-notation form of `engine_move`.
    #[must_use]
    pub fn matches(self, engine_move: shakmaty::Move) -> bool {
        Move::from(engine_move) == self
    }
}

impl From<shakmaty::Move> for Move {
    fn from(m: shakmaty::Move) -> Self {
        match m {
            shakmaty::Move::Normal {
                from,
                to,
                promotion,
                ..
            } => Move::new(from, to, promotion),
            shakmaty::Move::EnPassant { from, to } => Move::new(from, to, None),
            shakmaty::Move::Castle { king, rook } => {
                let side = CastlingSide::from_king_side(king < rook);
                let to = Square::from_coords(side.king_to_file(), king.rank());
                Move::new(king, to, None)
            }
            shakmaty::Move::Put { to, .. } => Move::new(to, to, None),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let illegal = || MoveError::Illegal {
            notation: s.to_string(),
        };
        match s.parse::<UciMove>().map_err(|_| illegal())? {
            UciMove::Normal {
                from,
                to,
                promotion,
            } => Ok(Move::new(from, to, promotion)),
            UciMove::Put { .. } | UciMove::Null => Err(illegal()),
        }
    }
}
