//! Channel → decoder table.
//!
//! The transport demultiplexes on the channel tag before any payload byte is
//! read, then hands the body to the decoder registered for that tag.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ProtoError;
use crate::payloads::{
    channel, decode_apply_effect, decode_clear_effects, decode_clear_single_effect, EffectCommand,
};
use crate::types::Identifier;

/// Decodes one payload body into `T`.
pub type Decoder<T> = fn(&[u8]) -> Result<T, ProtoError>;

/// Registry of payload decoders keyed by channel.
pub struct PayloadRegistry<T> {
    decoders: HashMap<Identifier, Decoder<T>>,
}

impl<T> PayloadRegistry<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a decoder. Each channel may only be registered once.
    pub fn register(&mut self, channel: Identifier, decoder: Decoder<T>) -> Result<(), ProtoError> {
        if self.decoders.contains_key(&channel) {
            return Err(ProtoError::DuplicateChannel(channel));
        }
        debug!("Registered payload channel {channel}");
        self.decoders.insert(channel, decoder);
        Ok(())
    }

    pub fn contains(&self, channel: &Identifier) -> bool {
        self.decoders.contains_key(channel)
    }

    /// Decode `payload` with the decoder registered for `channel`.
    pub fn decode(&self, channel: &Identifier, payload: &[u8]) -> Result<T, ProtoError> {
        match self.decoders.get(channel) {
            Some(decoder) => decoder(payload),
            None => Err(ProtoError::UnknownChannel(channel.clone())),
        }
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl<T> Default for PayloadRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadRegistry<EffectCommand> {
    /// Client → server registry with the three effect commands.
    pub fn c2s() -> Self {
        let mut registry = Self::new();
        if let Err(e) = registry.register_effect_commands() {
            warn!("Effect command channels not registered: {e}");
        }
        registry
    }

    /// Add the three effect command channels to this registry.
    pub fn register_effect_commands(&mut self) -> Result<(), ProtoError> {
        self.register(channel::apply_effect(), decode_apply_effect)?;
        self.register(channel::clear_effects(), decode_clear_effects)?;
        self.register(channel::clear_single_effect(), decode_clear_single_effect)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::{ApplyEffect, ClearSingleEffect};

    fn apply(id: &str, duration_ticks: u32, amplifier: u32) -> EffectCommand {
        EffectCommand::ApplyEffect(ApplyEffect {
            effect_id: Identifier::parse(id).unwrap(),
            duration_ticks,
            amplifier,
        })
    }

    fn roundtrip(cmd: &EffectCommand) -> EffectCommand {
        let bytes = cmd.encode();
        let decoded = EffectCommand::decode(&cmd.channel(), &bytes).unwrap();
        let via_registry = PayloadRegistry::c2s()
            .decode(&cmd.channel(), &bytes)
            .unwrap();
        assert_eq!(decoded, via_registry);
        decoded
    }

    #[test]
    fn c2s_has_three_channels() {
        let reg = PayloadRegistry::c2s();
        assert_eq!(reg.len(), 3);
        assert!(reg.contains(&channel::apply_effect()));
        assert!(reg.contains(&channel::clear_effects()));
        assert!(reg.contains(&channel::clear_single_effect()));
        assert!(!reg.contains(&channel::status()));
    }

    #[test]
    fn roundtrip_every_variant() {
        let commands = [
            apply("ns:speed", 200, 1),
            EffectCommand::ClearAll,
            EffectCommand::ClearOne(ClearSingleEffect {
                effect_id: Identifier::parse("ns:speed").unwrap(),
            }),
        ];
        for cmd in &commands {
            assert_eq!(&roundtrip(cmd), cmd);
        }
    }

    #[test]
    fn roundtrip_boundary_values() {
        for (duration, amplifier) in [(0, 0), (u32::MAX, u32::MAX), (0, u32::MAX)] {
            let cmd = apply("minecraft:night_vision", duration, amplifier);
            assert_eq!(roundtrip(&cmd), cmd);
        }
    }

    #[test]
    fn truncated_payloads_fail() {
        let reg = PayloadRegistry::c2s();
        let apply_bytes = apply("ns:speed", 200, 1).encode();
        for cut in 0..apply_bytes.len() {
            assert!(
                reg.decode(&channel::apply_effect(), &apply_bytes[..cut]).is_err(),
                "apply_effect cut at {cut} decoded"
            );
        }
        let one = EffectCommand::ClearOne(ClearSingleEffect {
            effect_id: Identifier::parse("ns:speed").unwrap(),
        })
        .encode();
        for cut in 0..one.len() {
            assert!(reg
                .decode(&channel::clear_single_effect(), &one[..cut])
                .is_err());
        }
    }

    #[test]
    fn trailing_bytes_fail() {
        let reg = PayloadRegistry::c2s();
        assert!(matches!(
            reg.decode(&channel::clear_effects(), &[0]),
            Err(ProtoError::TrailingBytes(1))
        ));
    }

    #[test]
    fn unknown_channel() {
        let reg = PayloadRegistry::c2s();
        let other = Identifier::parse("other:thing").unwrap();
        assert!(matches!(
            reg.decode(&other, &[]),
            Err(ProtoError::UnknownChannel(_))
        ));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = PayloadRegistry::c2s();
        let result = reg.register(channel::clear_effects(), |_| Ok(EffectCommand::ClearAll));
        assert!(matches!(result, Err(ProtoError::DuplicateChannel(_))));
    }

    #[test]
    fn effect_commands_register_once() {
        let mut reg: PayloadRegistry<EffectCommand> = PayloadRegistry::new();
        reg.register_effect_commands().unwrap();
        assert_eq!(reg.len(), 3);
        assert!(matches!(
            reg.register_effect_commands(),
            Err(ProtoError::DuplicateChannel(_))
        ));
    }

    #[test]
    fn custom_registry() {
        let mut reg: PayloadRegistry<u32> = PayloadRegistry::new();
        assert!(reg.is_empty());
        reg.register(Identifier::parse("ns:n").unwrap(), |p| Ok(p.len() as u32))
            .unwrap();
        assert_eq!(reg.decode(&Identifier::parse("ns:n").unwrap(), &[1, 2]).unwrap(), 2);
    }
}
