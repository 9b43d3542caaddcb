//! Custom payload definitions for the effect channel.
//!
//! Each payload travels on its own channel; the channel tag selects the
//! decoder, so payloads carry no discriminant of their own.

pub mod apply_effect;
pub mod clear_effects;
pub mod clear_single_effect;
pub mod hello;
pub mod status;

pub use apply_effect::ApplyEffect;
pub use clear_effects::ClearEffects;
pub use clear_single_effect::ClearSingleEffect;
pub use hello::Hello;
pub use status::StatusMessage;

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_exact, ProtoEncode};
use crate::error::ProtoError;
use crate::types::Identifier;

/// Channel tags. All live in the `potion-mod` namespace.
pub mod channel {
    use crate::types::Identifier;

    pub const NAMESPACE: &str = "potion-mod";

    // Client → Server
    pub const APPLY_EFFECT: &str = "apply_effect";
    pub const CLEAR_EFFECTS: &str = "clear_effects";
    pub const CLEAR_SINGLE_EFFECT: &str = "clear_single_effect";
    pub const HELLO: &str = "hello";

    // Server → Client
    pub const STATUS: &str = "status";

    pub fn apply_effect() -> Identifier {
        Identifier::from_static(NAMESPACE, APPLY_EFFECT)
    }

    pub fn clear_effects() -> Identifier {
        Identifier::from_static(NAMESPACE, CLEAR_EFFECTS)
    }

    pub fn clear_single_effect() -> Identifier {
        Identifier::from_static(NAMESPACE, CLEAR_SINGLE_EFFECT)
    }

    pub fn hello() -> Identifier {
        Identifier::from_static(NAMESPACE, HELLO)
    }

    pub fn status() -> Identifier {
        Identifier::from_static(NAMESPACE, STATUS)
    }
}

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectCommand {
    ApplyEffect(ApplyEffect),
    ClearAll,
    ClearOne(ClearSingleEffect),
}

impl EffectCommand {
    /// Channel this command is sent on.
    pub fn channel(&self) -> Identifier {
        match self {
            Self::ApplyEffect(_) => channel::apply_effect(),
            Self::ClearAll => channel::clear_effects(),
            Self::ClearOne(_) => channel::clear_single_effect(),
        }
    }

    /// Encode the payload body (without the channel tag).
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        match self {
            Self::ApplyEffect(p) => p.proto_encode(&mut buf),
            Self::ClearAll => ClearEffects.proto_encode(&mut buf),
            Self::ClearOne(p) => p.proto_encode(&mut buf),
        }
        buf.freeze()
    }

    /// Decode a payload body received on channel `tag`.
    pub fn decode(tag: &Identifier, payload: &[u8]) -> Result<Self, ProtoError> {
        if tag.namespace() != channel::NAMESPACE {
            return Err(ProtoError::UnknownChannel(tag.clone()));
        }
        match tag.path() {
            channel::APPLY_EFFECT => decode_apply_effect(payload),
            channel::CLEAR_EFFECTS => decode_clear_effects(payload),
            channel::CLEAR_SINGLE_EFFECT => decode_clear_single_effect(payload),
            _ => Err(ProtoError::UnknownChannel(tag.clone())),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApplyEffect(_) => "apply_effect",
            Self::ClearAll => "clear_effects",
            Self::ClearOne(_) => "clear_single_effect",
        }
    }
}

pub(crate) fn decode_apply_effect(payload: &[u8]) -> Result<EffectCommand, ProtoError> {
    decode_exact::<ApplyEffect>(payload).map(EffectCommand::ApplyEffect)
}

pub(crate) fn decode_clear_effects(payload: &[u8]) -> Result<EffectCommand, ProtoError> {
    decode_exact::<ClearEffects>(payload).map(|_| EffectCommand::ClearAll)
}

pub(crate) fn decode_clear_single_effect(payload: &[u8]) -> Result<EffectCommand, ProtoError> {
    decode_exact::<ClearSingleEffect>(payload).map(EffectCommand::ClearOne)
}
