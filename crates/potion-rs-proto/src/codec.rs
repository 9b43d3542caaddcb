//! Protocol encoding/decoding traits and helpers.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::types::VarUInt32;

/// Longest string accepted on the wire, in characters.
pub const MAX_STRING_CHARS: usize = 32767;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Write a protocol string (VarUInt32 byte length + UTF-8).
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    VarUInt32(s.len() as u32).proto_encode(buf);
    buf.put_slice(s.as_bytes());
}

/// Read a protocol string (VarUInt32 byte length + UTF-8).
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    let len = VarUInt32::proto_decode(buf)?.0 as usize;
    // Byte bound before copying, char bound after decoding.
    if len > MAX_STRING_CHARS * 3 {
        return Err(ProtoError::StringTooLong {
            len,
            max: MAX_STRING_CHARS * 3,
        });
    }
    if buf.remaining() < len {
        return Err(ProtoError::BufferTooShort {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let data = buf.copy_to_bytes(len);
    let s = String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)?;
    let chars = s.chars().count();
    if chars > MAX_STRING_CHARS {
        return Err(ProtoError::StringTooLong {
            len: chars,
            max: MAX_STRING_CHARS,
        });
    }
    Ok(s)
}

/// Read a big-endian u32, failing instead of panicking on short input.
pub fn read_u32(buf: &mut impl Buf) -> Result<u32, ProtoError> {
    if buf.remaining() < 4 {
        return Err(ProtoError::BufferTooShort {
            needed: 4,
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_u32())
}

/// Decode a value that must consume the whole payload.
pub fn decode_exact<T: ProtoDecode>(mut payload: &[u8]) -> Result<T, ProtoError> {
    let value = T::proto_decode(&mut payload)?;
    if !payload.is_empty() {
        return Err(ProtoError::TrailingBytes(payload.len()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn string_roundtrip() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "minecraft:speed");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "minecraft:speed");
    }

    #[test]
    fn string_empty() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn string_buffer_too_short() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "Hello");
        let truncated = buf.freeze().slice(..3);
        assert!(matches!(
            read_string(&mut truncated.clone()),
            Err(ProtoError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn string_invalid_utf8() {
        let data: &[u8] = &[2, 0xC3, 0x28];
        let mut cursor = data;
        assert!(matches!(
            read_string(&mut cursor),
            Err(ProtoError::InvalidUtf8)
        ));
    }

    #[test]
    fn string_too_long() {
        let long = "a".repeat(MAX_STRING_CHARS + 1);
        let mut buf = BytesMut::new();
        write_string(&mut buf, &long);
        assert!(matches!(
            read_string(&mut buf.freeze()),
            Err(ProtoError::StringTooLong { .. })
        ));
    }

    #[test]
    fn u32_is_big_endian() {
        let data: &[u8] = &[0x00, 0x00, 0x00, 0xC8];
        let mut cursor = data;
        assert_eq!(read_u32(&mut cursor).unwrap(), 200);
    }

    #[test]
    fn u32_short() {
        let data: &[u8] = &[0x00, 0x01];
        let mut cursor = data;
        assert!(read_u32(&mut cursor).is_err());
    }

    #[test]
    fn decode_exact_rejects_trailing() {
        let mut buf = BytesMut::new();
        VarUInt32(7).proto_encode(&mut buf);
        buf.extend_from_slice(&[1, 2]);
        assert!(matches!(
            decode_exact::<VarUInt32>(&buf),
            Err(ProtoError::TrailingBytes(2))
        ));
    }
}
