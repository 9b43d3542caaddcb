//! ClearSingleEffect (`potion-mod:clear_single_effect`) — Client → Server.
//!
//! Removes one effect from the sender.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::Identifier;

/// ClearSingleEffect payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearSingleEffect {
    pub effect_id: Identifier,
}

impl ProtoEncode for ClearSingleEffect {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.effect_id.proto_encode(buf);
    }
}

impl ProtoDecode for ClearSingleEffect {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            effect_id: Identifier::proto_decode(buf)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bare_path_uses_default_namespace() {
        let data: &[u8] = &[5, b's', b'p', b'e', b'e', b'd'];
        let mut cursor = data;
        let pkt = ClearSingleEffect::proto_decode(&mut cursor).unwrap();
        assert_eq!(pkt.effect_id.to_string(), "minecraft:speed");
    }

    #[test]
    fn decode_malformed_identifier() {
        let data: &[u8] = &[5, b'S', b'p', b'e', b'e', b'd'];
        let mut cursor = data;
        assert!(matches!(
            ClearSingleEffect::proto_decode(&mut cursor),
            Err(ProtoError::InvalidIdentifier(_))
        ));
    }
}
