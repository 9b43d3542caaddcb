//! Base data types used by the effect channel protocol.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VarIntError {
    #[error("buffer too short")]
    BufferTooShort,
    #[error("VarInt is too long (more than {max_bytes} bytes)")]
    TooManyBytes { max_bytes: usize },
}

// ---------------------------------------------------------------------------
// VarUInt32 (unsigned LEB128)
// ---------------------------------------------------------------------------

/// Unsigned variable-length integer (plain LEB128).
/// Used for frame lengths, string lengths and list counts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarUInt32(pub u32);

impl VarUInt32 {
    pub const MAX_BYTES: usize = 5;

    /// Number of bytes this value occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        let mut value = self.0;
        let mut len = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            len += 1;
        }
        len
    }
}

impl ProtoEncode for VarUInt32 {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarUInt32 {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let mut result: u32 = 0;
        let mut shift: u32 = 0;
        for i in 0..Self::MAX_BYTES {
            if !buf.has_remaining() {
                return Err(VarIntError::BufferTooShort.into());
            }
            let byte = buf.get_u8();
            result |= ((byte & 0x7F) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(VarUInt32(result));
            }
            shift += 7;
            if i == Self::MAX_BYTES - 1 {
                return Err(VarIntError::TooManyBytes {
                    max_bytes: Self::MAX_BYTES,
                }
                .into());
            }
        }
        Err(VarIntError::BufferTooShort.into())
    }
}

impl From<u32> for VarUInt32 {
    fn from(v: u32) -> Self {
        VarUInt32(v)
    }
}

impl From<VarUInt32> for u32 {
    fn from(v: VarUInt32) -> Self {
        v.0
    }
}

impl fmt::Debug for VarUInt32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarUInt32({})", self.0)
    }
}

impl fmt::Display for VarUInt32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifier (namespace:path)
// ---------------------------------------------------------------------------

/// A namespaced resource identifier, e.g. `minecraft:speed`.
///
/// Used both for effect ids and for channel tags. The namespace may only
/// contain `[a-z0-9_.-]`, the path additionally allows `/`. A string with no
/// `:` (or a leading `:`) falls back to the `minecraft` namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    /// Build an identifier from its two halves, validating both.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, ProtoError> {
        let namespace = namespace.into();
        let path = path.into();
        if !namespace.chars().all(is_namespace_char) {
            return Err(ProtoError::InvalidIdentifier(format!(
                "non [a-z0-9_.-] character in namespace of {namespace}:{path}"
            )));
        }
        if !path.chars().all(is_path_char) {
            return Err(ProtoError::InvalidIdentifier(format!(
                "non [a-z0-9/._-] character in path of {namespace}:{path}"
            )));
        }
        Ok(Self { namespace, path })
    }

    /// Build from halves known to be valid (compile-time channel names).
    pub(crate) fn from_static(namespace: &'static str, path: &'static str) -> Self {
        debug_assert!(namespace.chars().all(is_namespace_char));
        debug_assert!(path.chars().all(is_path_char));
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    /// Identifier in the default `minecraft` namespace.
    pub fn vanilla(path: impl Into<String>) -> Result<Self, ProtoError> {
        Self::new(Self::DEFAULT_NAMESPACE, path)
    }

    /// Parse `namespace:path` or a bare `path`.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        match s.split_once(':') {
            Some(("", path)) => Self::vanilla(path),
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::vanilla(s),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl FromStr for Identifier {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({self})")
    }
}

impl ProtoEncode for Identifier {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.to_string());
    }
}

impl ProtoDecode for Identifier {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Self::parse(&read_string(buf)?)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
