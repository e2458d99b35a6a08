//! The transport boundary: inbound request records and outbound events.
//!
//! The collaborator on the other side of this boundary delivers named
//! events with JSON payloads and forwards named events back to individual
//! connections. Each inbound event gets its own request record so that
//! required-field validation happens here, in one place, instead of deep
//! in the handlers.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::engine::feedback::{self, LetterVerdict};

/// `game_result` message for the winning seat.
pub const RESULT_WON: &str = "You won!";

/// `game_result` message for the losing seat.
pub const RESULT_LOST: &str = "You lost!";

/// `join_game` / `play_vs_bot` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinGameRequest {
    pub category: String,
    pub nickname: String,
}

/// `join_game_with_code` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinWithCodeRequest {
    #[serde(rename = "roomCode")]
    pub room_code: String,
    pub category: String,
    pub nickname: String,
}

/// `guess` payload. The room is inferred from the sender when the code is
/// omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessRequest {
    pub guess: String,
    #[serde(rename = "roomCode", default)]
    pub room_code: Option<String>,
}

/// A named inbound event, parsed into its typed request record.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    JoinGame(JoinGameRequest),
    JoinGameWithCode(JoinWithCodeRequest),
    PlayVsBot(JoinGameRequest),
    Guess(GuessRequest),
    RematchRequest,
    RematchResponse(String),
    Disconnect,
}

impl ClientEvent {
    /// Parse a named payload from the transport. `None` marks malformed
    /// input — unknown name, missing or mistyped fields — which callers
    /// drop without a reply.
    pub fn parse(name: &str, payload: &Value) -> Option<Self> {
        match name {
            "join_game" => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::JoinGame),
            "join_game_with_code" => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::JoinGameWithCode),
            "play_vs_bot" => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::PlayVsBot),
            "guess" => serde_json::from_value(payload.clone()).ok().map(Self::Guess),
            "rematch_request" => Some(Self::RematchRequest),
            "rematch_response" => payload
                .as_str()
                .map(|answer| Self::RematchResponse(answer.to_string())),
            "disconnect" => Some(Self::Disconnect),
            _ => None,
        }
    }
}

/// An event addressed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    /// Connection id of the recipient. Never a bot seat.
    pub to: String,
    pub event: ServerEvent,
}

/// Engine-to-client events.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Round start. Carries the round's secret word, which clients use to
    /// drive the board.
    MatchFound { secret: String },
    /// Turn flag for the recipient.
    YourTurn(bool),
    /// Nickname pairing, individualized per seat.
    NicknameInfo { own: String, opponent: String },
    /// A guess was made in the recipient's room, with its feedback.
    OpponentGuess {
        guess: String,
        feedback: Vec<LetterVerdict>,
    },
    /// Round decided; the message tells the recipient how it went.
    GameResult(String),
    /// The other human left; the room is gone.
    OpponentLeft,
    /// The opponent proposes a rematch.
    RematchRequest,
    /// The opponent's answer to a rematch proposal, verbatim.
    RematchResponse(String),
    /// Request-level failure surfaced to the sender.
    Error(String),
}

impl ServerEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MatchFound { .. } => "match_found",
            Self::YourTurn(_) => "your_turn",
            Self::NicknameInfo { .. } => "nickname_info",
            Self::OpponentGuess { .. } => "opponent_guess",
            Self::GameResult(_) => "game_result",
            Self::OpponentLeft => "opponent_left",
            Self::RematchRequest => "rematch_request",
            Self::RematchResponse(_) => "rematch_response",
            Self::Error(_) => "error",
        }
    }

    /// Wire payload.
    pub fn payload(&self) -> Value {
        match self {
            Self::MatchFound { secret } => json!(secret),
            Self::YourTurn(flag) => json!(flag),
            Self::NicknameInfo { own, opponent } => {
                json!({ "self": own, "opponent": opponent })
            }
            Self::OpponentGuess { guess, feedback } => {
                json!({ "guess": guess, "feedback": feedback::sequence_to_json(feedback) })
            }
            Self::GameResult(message) => json!(message),
            Self::OpponentLeft | Self::RematchRequest => Value::Null,
            Self::RematchResponse(answer) => json!(answer),
            Self::Error(message) => json!(message),
        }
    }
}
