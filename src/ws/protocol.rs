//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::{PlayerId, PlayerState};

/// Movement intent held by a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    /// Thrust
    #[serde(rename = "w")]
    pub forward: bool,
    /// Brake / reverse
    #[serde(rename = "s")]
    pub brake: bool,
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Latest intent; replaces whatever the server held before
    Input {
        keys: Keys,
        /// Desired facing in radians, not range-checked
        #[serde(rename = "targetAngle")]
        target_angle: f64,
        /// Client sequence number, echoed back as lastProcessedInput
        sequence: u64,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg<'a> {
    /// Identity assignment, sent once before any state
    Id { id: &'a str },

    /// Full world snapshot
    State {
        players: &'a BTreeMap<PlayerId, PlayerState>,
    },
}

impl ServerMsg<'_> {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode a text frame from a client
pub fn decode_client_msg(text: &str) -> Result<ClientMsg, serde_json::Error> {
    serde_json::from_str(text)
}
