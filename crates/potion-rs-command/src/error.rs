//! Command denials.

use potion_rs_proto::payloads::StatusMessage;
use potion_rs_proto::types::Identifier;
use thiserror::Error;

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    #[error("caller is not allowed to change effects")]
    NotAuthorized,

    #[error("unknown effect: {0}")]
    UnknownEffect(Identifier),
}

/// A refused command. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Denial {
    pub reason: DenialReason,
}

impl Denial {
    pub fn not_authorized() -> Self {
        Self {
            reason: DenialReason::NotAuthorized,
        }
    }

    pub fn unknown_effect(id: Identifier) -> Self {
        Self {
            reason: DenialReason::UnknownEffect(id),
        }
    }

    /// Message shown to the caller.
    pub fn message(&self) -> StatusMessage {
        match &self.reason {
            DenialReason::NotAuthorized => StatusMessage::creative_only(),
            DenialReason::UnknownEffect(id) => StatusMessage::unknown_effect(id.to_string()),
        }
    }
}
