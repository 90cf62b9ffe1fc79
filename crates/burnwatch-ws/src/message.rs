// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire envelope for the realtime channel.
//!
//! Every frame is JSON `{type, payload, timestamp}`. Unknown `type` values
//! are ignored by the dispatcher so the backend can grow new kinds without
//! breaking older clients.

use serde::Deserialize;
use serde_json::Value;

/// Inbound message kinds the client acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    UsageUpdate,
    SessionUpdate,
    CostUpdate,
    LimitWarning,
    ConnectionStatus,
    Error,
}

/// One frame as received from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Envelope {
    /// The known kind, if any. Unknown strings return `None` and the frame
    /// is dropped upstream.
    pub fn known_kind(&self) -> Option<MessageKind> {
        self.kind.parse().ok()
    }
}

/// Heartbeat frame sent periodically while the socket is open.
pub fn ping_frame() -> String {
    r#"{"type":"ping"}"#.to_string()
}
