//! Length-prefixed channel frames.
//!
//! Wire layout: `VarUInt32(body_len) + Identifier(channel) + payload`.
//! The same framing is used in both directions.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::{Identifier, VarIntError, VarUInt32};

/// Largest accepted frame body (1 MiB).
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// One channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub channel: Identifier,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(channel: Identifier, payload: impl Into<Bytes>) -> Self {
        Self {
            channel,
            payload: payload.into(),
        }
    }

    /// Build a frame from an encodable payload.
    pub fn from_payload(channel: Identifier, payload: &impl ProtoEncode) -> Self {
        let mut buf = BytesMut::new();
        payload.proto_encode(&mut buf);
        Self::new(channel, buf.freeze())
    }
}

/// Encode a frame including its length prefix.
pub fn encode_frame(frame: &Frame) -> Bytes {
    let mut body = BytesMut::new();
    frame.channel.proto_encode(&mut body);
    body.put_slice(&frame.payload);

    let mut out = BytesMut::with_capacity(VarUInt32::MAX_BYTES + body.len());
    VarUInt32(body.len() as u32).proto_encode(&mut out);
    out.put_slice(&body);
    out.freeze()
}

/// Try to take one complete frame off the front of `buf`.
///
/// Returns `Ok(None)` while the frame is still incomplete. A frame whose
/// channel tag fails to decode is still consumed and reported as
/// [`ProtoError::FrameBody`], so the stream stays aligned.
pub fn decode_frame(buf: &mut BytesMut) -> Result<Option<Frame>, ProtoError> {
    let mut peek = &buf[..];
    let len = match VarUInt32::proto_decode(&mut peek) {
        Ok(v) => v.0 as usize,
        Err(ProtoError::VarInt(VarIntError::BufferTooShort)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }
    if peek.len() < len {
        return Ok(None);
    }
    let header_len = buf.len() - peek.len();
    buf.advance(header_len);
    let mut body = buf.split_to(len).freeze();
    let channel = Identifier::proto_decode(&mut body)
        .map_err(|e| ProtoError::FrameBody(Box::new(e)))?;
    Ok(Some(Frame {
        channel,
        payload: body,
    }))
}
