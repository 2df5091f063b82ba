use crate::model::connection::ConnectionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{id, username}` entry of a `userJoined` roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMember {
    pub id: ConnectionId,
    pub username: String,
}

/// Events a client sends to the relay.
///
/// Call payloads (`offer`, `answer`, `candidate`) are opaque to the server
/// and forwarded verbatim; only the browsers interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    Join { username: String, room_id: String },
    Message {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    InitiateCall {
        target_user_id: ConnectionId,
        offer: Value,
    },
    #[serde(rename_all = "camelCase")]
    AnswerCall {
        target_user_id: ConnectionId,
        answer: Value,
    },
    #[serde(rename_all = "camelCase")]
    RejectCall { target_user_id: ConnectionId },
    #[serde(rename_all = "camelCase")]
    EndCall { target_user_id: ConnectionId },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        target_user_id: ConnectionId,
        candidate: Value,
    },
}

/// Events the relay sends back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Tells a freshly connected client its server-assigned id.
    #[serde(rename_all = "camelCase")]
    Welcome { user_id: ConnectionId },
    #[serde(rename_all = "camelCase")]
    UserJoined {
        user_id: ConnectionId,
        username: String,
        users_in_room: Vec<RoomMember>,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft {
        user_id: ConnectionId,
        username: String,
    },
    #[serde(rename_all = "camelCase")]
    Message {
        user_id: ConnectionId,
        username: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    IncomingCall {
        from: ConnectionId,
        from_username: String,
        offer: Value,
    },
    CallAnswered {
        from: ConnectionId,
        answer: Value,
    },
    CallRejected { from: ConnectionId },
    CallEnded { from: ConnectionId },
    IceCandidate {
        from: ConnectionId,
        candidate: Value,
    },
}
