//! Status (`potion-mod:status`) — Server → Client.
//!
//! Feedback for a handled command. Carries a translation key plus positional
//! arguments so the client can localize it; `Display` renders the built-in
//! English text for hosts without a translation table.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::VarUInt32;

/// Translation keys used by the effect channel.
pub mod key {
    pub const EFFECT_APPLIED: &str = "message.potion_mod.effect_applied";
    pub const ALL_EFFECTS_CLEARED: &str = "message.potion_mod.all_effects_cleared";
    pub const EFFECT_CLEARED: &str = "message.potion_mod.effect_cleared";
    pub const CREATIVE_ONLY: &str = "message.potion_mod.creative_only";
    pub const UNKNOWN_EFFECT: &str = "message.potion_mod.unknown_effect";
}

/// Upper bound on decoded arguments; real messages carry at most three.
const MAX_ARGS: usize = 16;

/// A translatable status message sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub key: String,
    pub args: Vec<String>,
}

impl StatusMessage {
    pub fn new(key: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            key: key.into(),
            args,
        }
    }

    /// `<name>` applied at 1-based `tier` for `seconds`.
    pub fn effect_applied(name: impl Into<String>, tier: u64, seconds: u32) -> Self {
        Self::new(
            key::EFFECT_APPLIED,
            vec![name.into(), tier.to_string(), seconds.to_string()],
        )
    }

    pub fn all_effects_cleared() -> Self {
        Self::new(key::ALL_EFFECTS_CLEARED, Vec::new())
    }

    pub fn effect_cleared(name: impl Into<String>) -> Self {
        Self::new(key::EFFECT_CLEARED, vec![name.into()])
    }

    pub fn creative_only() -> Self {
        Self::new(key::CREATIVE_ONLY, Vec::new())
    }

    pub fn unknown_effect(effect_id: impl Into<String>) -> Self {
        Self::new(key::UNKNOWN_EFFECT, vec![effect_id.into()])
    }

    /// English template for a known key. `%s` placeholders are filled in order.
    fn template(&self) -> Option<&'static str> {
        match self.key.as_str() {
            key::EFFECT_APPLIED => Some("Applied %s (level %s) for %s seconds"),
            key::ALL_EFFECTS_CLEARED => Some("All effects cleared"),
            key::EFFECT_CLEARED => Some("Cleared %s"),
            key::CREATIVE_ONLY => Some("This can only be used in creative mode"),
            key::UNKNOWN_EFFECT => Some("Unknown effect: %s"),
            _ => None,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(template) = self.template() else {
            // Unknown key: show it raw so nothing is silently lost.
            write!(f, "{}", self.key)?;
            if !self.args.is_empty() {
                write!(f, " [{}]", self.args.join(", "))?;
            }
            return Ok(());
        };
        let mut args = self.args.iter();
        let mut parts = template.split("%s");
        if let Some(first) = parts.next() {
            f.write_str(first)?;
        }
        for part in parts {
            f.write_str(args.next().map(String::as_str).unwrap_or(""))?;
            f.write_str(part)?;
        }
        Ok(())
    }
}

impl ProtoEncode for StatusMessage {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.key);
        VarUInt32(self.args.len() as u32).proto_encode(buf);
        for arg in &self.args {
            write_string(buf, arg);
        }
    }
}

impl ProtoDecode for StatusMessage {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let key = read_string(buf)?;
        let count = VarUInt32::proto_decode(buf)?.0 as usize;
        if count > MAX_ARGS {
            return Err(ProtoError::TooManyElements {
                count,
                max: MAX_ARGS,
            });
        }
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            args.push(read_string(buf)?);
        }
        Ok(Self { key, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn effect_applied_text() {
        let msg = StatusMessage::effect_applied("Speed", 2, 10);
        assert_eq!(msg.key, key::EFFECT_APPLIED);
        assert_eq!(msg.args, vec!["Speed", "2", "10"]);
        assert_eq!(msg.to_string(), "Applied Speed (level 2) for 10 seconds");
    }

    #[test]
    fn fixed_messages_have_no_args() {
        assert!(StatusMessage::all_effects_cleared().args.is_empty());
        assert!(StatusMessage::creative_only().args.is_empty());
        assert_eq!(
            StatusMessage::all_effects_cleared().to_string(),
            "All effects cleared"
        );
    }

    #[test]
    fn effect_cleared_text() {
        assert_eq!(
            StatusMessage::effect_cleared("Night Vision").to_string(),
            "Cleared Night Vision"
        );
    }

    #[test]
    fn unknown_key_renders_raw() {
        let msg = StatusMessage::new("custom.key", vec!["a".into(), "b".into()]);
        assert_eq!(msg.to_string(), "custom.key [a, b]");
    }

    #[test]
    fn wire_roundtrip() {
        let msg = StatusMessage::effect_applied("Speed", 2, 10);
        let mut buf = BytesMut::new();
        msg.proto_encode(&mut buf);
        let decoded = StatusMessage::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn rejects_absurd_arg_count() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, key::EFFECT_CLEARED);
        VarUInt32(1000).proto_encode(&mut buf);
        assert!(matches!(
            StatusMessage::proto_decode(&mut buf.freeze()),
            Err(ProtoError::TooManyElements { count: 1000, .. })
        ));
    }
}
