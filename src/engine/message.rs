//! Wire messages exchanged with the search worker.
//!
//! Messages are JSON objects discriminated by a `kind` field:
//!
//! ```text
//! { "kind": "init",    "sessionId": 5, "searchDepth": 3 }
//! { "kind": "request", "sessionId": 5, "boardSnapshot": "<FEN>" }
//! { "kind": "request", "sessionId": 5, "moveHistory": "<PGN>" }
//! { "kind": "result",  "sessionId": 5, "move": { "from": "e2", "to": "e4" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Move, MoveError, Role, Square};
use crate::sync::SessionId;

use super::error::DispatchError;

/// A move on the wire: square names plus an optional lowercase promotion
/// letter (`q`, `r`, `b` or `n`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        WireMove {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
            promotion: mv.promotion.map(|role| role.char().to_string()),
        }
    }
}

impl TryFrom<&WireMove> for Move {
    type Error = MoveError;

    fn try_from(wire: &WireMove) -> Result<Self, Self::Error> {
        let illegal = || MoveError::Illegal {
            notation: format!(
                "{}{}{}",
                wire.from,
                wire.to,
                wire.promotion.as_deref().unwrap_or("")
            ),
        };
        let from: Square = wire.from.parse().map_err(|_| illegal())?;
        let to: Square = wire.to.parse().map_err(|_| illegal())?;
        let promotion = match wire.promotion.as_deref() {
            None => None,
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next().and_then(Role::from_char), chars.next()) {
                    (Some(role), None) => Some(role),
                    _ => return Err(illegal()),
                }
            }
        };
        Ok(Move::new(from, to, promotion))
    }
}

/// A message into or out of the search worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// Start a new session, optionally changing the default search depth.
    /// Never answered.
    #[serde(rename_all = "camelCase")]
    Init {
        session_id: SessionId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search_depth: Option<u32>,
    },
    /// Ask for a move. Exactly one of the two position encodings is set.
    #[serde(rename_all = "camelCase")]
    Request {
        session_id: SessionId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        board_snapshot: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        move_history: Option<String>,
    },
    /// The worker's answer; `move` is absent when the side to move has no
    /// legal move.
    #[serde(rename_all = "camelCase")]
    Result {
        session_id: SessionId,
        #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
        best_move: Option<WireMove>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn init(session_id: SessionId) -> Self {
        WorkerMessage::Init {
            session_id,
            search_depth: None,
        }
    }

    #[must_use]
    pub fn init_with_depth(session_id: SessionId, depth: u32) -> Self {
        WorkerMessage::Init {
            session_id,
            search_depth: Some(depth),
        }
    }

    /// A request carrying a FEN board snapshot.
    pub fn snapshot(session_id: SessionId, fen: impl Into<String>) -> Self {
        WorkerMessage::Request {
            session_id,
            board_snapshot: Some(fen.into()),
            move_history: None,
        }
    }

    /// A request carrying a PGN move history.
    pub fn history(session_id: SessionId, pgn: impl Into<String>) -> Self {
        WorkerMessage::Request {
            session_id,
            board_snapshot: None,
            move_history: Some(pgn.into()),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        match self {
            WorkerMessage::Init { session_id, .. }
            | WorkerMessage::Request { session_id, .. }
            | WorkerMessage::Result { session_id, .. } => *session_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerMessage::Init { .. } => "init",
            WorkerMessage::Request { .. } => "request",
            WorkerMessage::Result { .. } => "result",
        }
    }

    /// The move carried by a `result`, converted back to a [`Move`].
    pub fn result_move(&self) -> Option<Result<Move, MoveError>> {
        match self {
            WorkerMessage::Result {
                best_move: Some(wire),
                ..
            } => Some(Move::try_from(wire)),
            _ => None,
        }
    }

    /// Decode one message; anything that is not a well-formed message of a
    /// known kind is a protocol error.
    pub fn from_json(text: &str) -> Result<Self, DispatchError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, DispatchError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_shape() {
        let value = serde_json::to_value(WorkerMessage::init_with_depth(5, 4)).unwrap();
        assert_eq!(value, json!({"kind": "init", "sessionId": 5, "searchDepth": 4}));

        let value = serde_json::to_value(WorkerMessage::init(6)).unwrap();
        assert_eq!(value, json!({"kind": "init", "sessionId": 6}));
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(WorkerMessage::history(2, "1. e4 *")).unwrap();
        assert_eq!(
            value,
            json!({"kind": "request", "sessionId": 2, "moveHistory": "1. e4 *"})
        );
    }

    #[test]
    fn test_result_shape() {
        let mv = Move::new(Square::A7, Square::A8, Some(Role::Queen));
        let msg = WorkerMessage::Result {
            session_id: 9,
            best_move: Some(mv.into()),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "kind": "result",
                "sessionId": 9,
                "move": {"from": "a7", "to": "a8", "promotion": "q"}
            })
        );
        assert_eq!(msg.result_move(), Some(Ok(mv)));

        let empty = WorkerMessage::Result {
            session_id: 9,
            best_move: None,
        };
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({"kind": "result", "sessionId": 9})
        );
    }

    #[test]
    fn test_decode_snapshot_request() {
        let msg = WorkerMessage::from_json(
            r#"{"kind":"request","sessionId":3,"boardSnapshot":"8/8/8/8/8/8/8/K1k5 w - - 0 1"}"#,
        )
        .unwrap();
        assert_eq!(msg, WorkerMessage::snapshot(3, "8/8/8/8/8/8/8/K1k5 w - - 0 1"));
        assert_eq!(msg.kind(), "request");
        assert_eq!(msg.session_id(), 3);
    }

    #[test]
    fn test_unknown_kind_is_protocol_error() {
        let err = WorkerMessage::from_json(r#"{"kind":"ponder","sessionId":1}"#).unwrap_err();
        assert!(matches!(err, DispatchError::Protocol(_)));

        let err = WorkerMessage::from_json("not json").unwrap_err();
        assert!(matches!(err, DispatchError::Protocol(_)));
    }

    #[test]
    fn test_wire_move_rejects_bad_promotion() {
        let wire = WireMove {
            from: "a7".to_string(),
            to: "a8".to_string(),
            promotion: Some("qq".to_string()),
        };
        assert!(Move::try_from(&wire).is_err());

        let wire = WireMove {
            from: "z9".to_string(),
            to: "a8".to_string(),
            promotion: None,
        };
        assert!(Move::try_from(&wire).is_err());
    }
}
