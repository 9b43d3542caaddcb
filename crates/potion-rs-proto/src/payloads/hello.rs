//! Hello (`potion-mod:hello`) — Client → Server.
//!
//! First frame on a connection; names the player for the rest of the session.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Longest accepted player name.
pub const MAX_NAME_LEN: usize = 32;

/// Hello payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    pub name: String,
}

impl ProtoEncode for Hello {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.name);
    }
}

impl ProtoDecode for Hello {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let name = read_string(buf)?;
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ProtoError::StringTooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }
        if name.trim().is_empty() {
            return Err(ProtoError::InvalidData("empty player name".into()));
        }
        Ok(Self { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode(name: &str) -> BytesMut {
        let mut buf = BytesMut::new();
        Hello { name: name.into() }.proto_encode(&mut buf);
        buf
    }

    #[test]
    fn roundtrip() {
        let decoded = Hello::proto_decode(&mut encode("Steve").freeze()).unwrap();
        assert_eq!(decoded.name, "Steve");
    }

    #[test]
    fn rejects_blank_name() {
        assert!(Hello::proto_decode(&mut encode("  ").freeze()).is_err());
    }

    #[test]
    fn rejects_long_name() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            Hello::proto_decode(&mut encode(&long).freeze()),
            Err(ProtoError::StringTooLong { .. })
        ));
    }
}
