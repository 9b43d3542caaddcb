//! ApplyEffect (`potion-mod:apply_effect`) — Client → Server.
//!
//! Requests a status effect on the sending player.

use bytes::{Buf, BufMut};

use crate::codec::{read_u32, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::Identifier;

/// ApplyEffect payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyEffect {
    /// Effect to apply, e.g. `minecraft:speed`.
    pub effect_id: Identifier,
    /// Duration in ticks (20 per second). Not clamped.
    pub duration_ticks: u32,
    /// Zero-based level (0 = level I).
    pub amplifier: u32,
}

impl ProtoEncode for ApplyEffect {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.effect_id.proto_encode(buf);
        buf.put_u32(self.duration_ticks);
        buf.put_u32(self.amplifier);
    }
}

impl ProtoDecode for ApplyEffect {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let effect_id = Identifier::proto_decode(buf)?;
        let duration_ticks = read_u32(buf)?;
        let amplifier = read_u32(buf)?;
        Ok(Self {
            effect_id,
            duration_ticks,
            amplifier,
        })
    }
}
