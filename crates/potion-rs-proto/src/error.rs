//! Protocol-level errors.

use thiserror::Error;

use crate::types::Identifier;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt encoding error: {0}")]
    VarInt(#[from] crate::types::VarIntError),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("string too long: {len} (max {max})")]
    StringTooLong { len: usize, max: usize },

    #[error("too many elements: {count} (max {max})")]
    TooManyElements { count: usize, max: usize },

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("payload has {0} unread trailing bytes")]
    TrailingBytes(usize),

    #[error("unknown channel: {0}")]
    UnknownChannel(Identifier),

    #[error("channel already registered: {0}")]
    DuplicateChannel(Identifier),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// The length prefix was fine but the body did not decode. The frame has
    /// already been consumed.
    #[error("invalid frame body: {0}")]
    FrameBody(#[source] Box<ProtoError>),
}

impl ProtoError {
    /// Whether a reader can no longer find the next frame boundary.
    pub fn breaks_stream(&self) -> bool {
        matches!(self, Self::FrameTooLarge { .. } | Self::VarInt(_))
    }
}
