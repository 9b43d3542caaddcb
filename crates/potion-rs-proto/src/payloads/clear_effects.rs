//! ClearEffects (`potion-mod:clear_effects`) — Client → Server.
//!
//! Unit payload: asks the server to clear every active effect on the sender.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// ClearEffects payload (no fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearEffects;

impl ProtoEncode for ClearEffects {
    fn proto_encode(&self, _buf: &mut impl BufMut) {}
}

impl ProtoDecode for ClearEffects {
    fn proto_decode(_buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self)
    }
}
