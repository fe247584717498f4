//! Wire protocol - JSON text frames sent to the game server
//!
//! Adjacently tagged: `{ "type": "...", "value": { ... } }`.

use serde::Serialize;

use crate::{ConditionedSample, ContractError, PlayerIdentity};

/// Registration tag expected by the server
pub const REGISTER_TAG: &str = "registerPlayer";

/// Outbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Sent once per successful connection
    RegisterPlayer(PlayerPayload),
    /// Sent on explicit user action
    Ready(PlayerPayload),
    /// Sent once per conditioned sample while connected
    Controls(ControlsPayload),
}

impl ClientMessage {
    pub fn register(identity: &PlayerIdentity) -> Self {
        Self::RegisterPlayer(PlayerPayload {
            player_name: identity.clone(),
        })
    }

    pub fn ready(identity: &PlayerIdentity) -> Self {
        Self::Ready(PlayerPayload {
            player_name: identity.clone(),
        })
    }

    pub fn controls(sample: &ConditionedSample) -> Self {
        Self::Controls(ControlsPayload::from(*sample))
    }

    /// Message tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::RegisterPlayer(_) => REGISTER_TAG,
            ClientMessage::Ready(_) => "ready",
            ClientMessage::Controls(_) => "controls",
        }
    }

    /// Encode as a JSON text frame
    pub fn encode(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `value` of registration and ready messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub player_name: PlayerIdentity,
}

/// `value` of a controls message
///
/// Absent axes serialize as `null`, never as 0, so the server can tell
/// "centered" from "unavailable".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlsPayload {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl From<ConditionedSample> for ControlsPayload {
    fn from(sample: ConditionedSample) -> Self {
        Self {
            alpha: sample.alpha,
            beta: sample.beta,
            gamma: sample.gamma,
        }
    }
}
