//! Message types that travel on the wire.
//!
//! Every frame is an [`Envelope`]: a client-chosen sequence number plus a
//! payload. The server answers each request with exactly one envelope
//! carrying the same `seq`, so a client can keep several requests in flight
//! and still match up the replies.
//!
//! ```text
//! → {"seq":1,"payload":{"type":"NewGame"}}
//! ← {"seq":1,"payload":{"type":"Game","id":"9f…","current":"____","guesses_remaining":6}}
//! → {"seq":2,"payload":{"type":"Guess","id":"9f…","guess":"e"}}
//! ← {"seq":2,"payload":{"type":"Game","id":"9f…","current":"_E__","guesses_remaining":6}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque identifier of one game session.
///
/// Serialized as a bare string. The server never interprets its contents;
/// it only has to be unique among live games.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty id, which no game ever has.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// What a player is allowed to see of a game: never the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    /// The revealed word, `_` for letters not yet found.
    pub current: String,
    pub guesses_remaining: u32,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A framed message. `seq` is echoed verbatim on the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub payload: T,
}

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// Client → server requests, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Start a new game.
    NewGame,

    /// Guess one letter in an existing game.
    ///
    /// Both fields default to empty when absent so the game service, not
    /// the decoder, is the one that reports them as a bad request.
    Guess {
        #[serde(default)]
        id: GameId,
        #[serde(default)]
        guess: String,
    },

    /// Liveness probe.
    Health,
}

/// Server → client replies, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The state of a game after the request. Also sent for the turn that
    /// ends a game; the next guess on that id is answered with a 404.
    Game(GameSummary),

    /// Answer to [`ClientMessage::Health`].
    Health { status: String },

    /// The request failed. `code` follows HTTP conventions: 400 bad
    /// request, 404 unknown or finished game, 500 server fault.
    Error { code: u16, message: String },
}

impl ServerMessage {
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&GameId::new("abc")).unwrap();
        assert_eq!(json, r#""abc""#);
    }

    #[test]
    fn test_guess_missing_fields_default_to_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Guess"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Guess {
                id: GameId::default(),
                guess: String::new(),
            }
        );
    }

    #[test]
    fn test_game_reply_is_flattened_under_type_tag() {
        let msg = ServerMessage::Game(GameSummary {
            id: GameId::new("g1"),
            current: "_E__".into(),
            guesses_remaining: 6,
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "Game");
        assert_eq!(value["id"], "g1");
        assert_eq!(value["current"], "_E__");
        assert_eq!(value["guesses_remaining"], 6);
    }

    #[test]
    fn test_new_game_request_is_tag_only() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"NewGame"}"#).unwrap();
        assert_eq!(msg, ClientMessage::NewGame);
    }
}
