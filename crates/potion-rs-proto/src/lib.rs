//! Wire protocol for the remote effect channel: identifiers, payloads and framing.

pub mod codec;
pub mod error;
pub mod frame;
pub mod payloads;
pub mod registry;
pub mod types;
