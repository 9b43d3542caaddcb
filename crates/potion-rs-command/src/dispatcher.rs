//! Routes decoded effect commands to the host after the permission check.

use std::fmt;
use std::str::FromStr;

use potion_rs_proto::payloads::{ApplyEffect, ClearSingleEffect, EffectCommand, StatusMessage};
use potion_rs_proto::registry::PayloadRegistry;
use potion_rs_proto::types::Identifier;
use tracing::{debug, info, warn};

use crate::error::Denial;
use crate::host::{Caller, DisplayFlags, EffectDefinition, EffectHost, EffectInstance, EffectRegistry};

/// Game ticks per second, used for the duration shown to players.
pub const TICKS_PER_SECOND: u32 = 20;

/// What to do with an effect id the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownEffectPolicy {
    /// Drop the command without feedback.
    #[default]
    Silent,
    /// Refuse with an `unknown_effect` message.
    Deny,
}

impl FromStr for UnknownEffectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "deny" => Ok(Self::Deny),
            other => Err(format!("unknown effect policy: {other} (expected silent or deny)")),
        }
    }
}

impl fmt::Display for UnknownEffectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => f.write_str("silent"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

/// Outcome of [`Dispatcher::receive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Command ran and a status message was sent.
    Delivered,
    /// Command was refused and the denial message was sent.
    Denied,
    /// Command was dropped without feedback (unknown effect, silent policy).
    Absorbed,
    /// Payload did not decode. Nothing ran, nothing was sent.
    Dropped,
}

/// Effect command dispatcher.
pub struct Dispatcher<R> {
    registry: R,
    payloads: PayloadRegistry<EffectCommand>,
    policy: UnknownEffectPolicy,
}

impl<R: EffectRegistry> Dispatcher<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            payloads: PayloadRegistry::c2s(),
            policy: UnknownEffectPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownEffectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownEffectPolicy {
        self.policy
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Whether `channel` carries an effect command.
    pub fn accepts(&self, channel: &Identifier) -> bool {
        self.payloads.contains(channel)
    }

    /// Decode a raw payload and handle it, sending at most one message back.
    pub fn receive<H: EffectHost + ?Sized>(
        &self,
        channel: &Identifier,
        payload: &[u8],
        caller: &Caller,
        host: &mut H,
    ) -> Delivery {
        let command = match self.payloads.decode(channel, payload) {
            Ok(c) => c,
            Err(e) => {
                warn!("Bad {channel} payload from {}: {e}", caller.name);
                return Delivery::Dropped;
            }
        };

        match self.handle(command, caller, host) {
            Ok(Some(message)) => {
                host.send_message(caller, message);
                Delivery::Delivered
            }
            Ok(None) => Delivery::Absorbed,
            Err(denial) => {
                host.send_message(caller, denial.message());
                Delivery::Denied
            }
        }
    }

    /// Handle one command for `caller`.
    ///
    /// `Ok(None)` means the command was absorbed without a reply.
    pub fn handle<H: EffectHost + ?Sized>(
        &self,
        command: EffectCommand,
        caller: &Caller,
        host: &mut H,
    ) -> Result<Option<StatusMessage>, Denial> {
        if !caller.is_elevated() {
            debug!("{} denied {}: not elevated", caller.name, command.name());
            return Err(Denial::not_authorized());
        }

        match command {
            EffectCommand::ApplyEffect(apply) => self.apply_effect(apply, caller, host),
            EffectCommand::ClearAll => {
                host.clear_all_effects(caller);
                info!("Cleared all effects for {}", caller.name);
                Ok(Some(StatusMessage::all_effects_cleared()))
            }
            EffectCommand::ClearOne(clear) => self.clear_effect(clear, caller, host),
        }
    }

    fn apply_effect<H: EffectHost + ?Sized>(
        &self,
        apply: ApplyEffect,
        caller: &Caller,
        host: &mut H,
    ) -> Result<Option<StatusMessage>, Denial> {
        let Some(effect) = self.resolve(&apply.effect_id, caller)? else {
            return Ok(None);
        };

        let instance = EffectInstance {
            duration_ticks: apply.duration_ticks,
            amplifier: apply.amplifier,
            flags: DisplayFlags::REMOTE,
        };
        host.apply_effect(caller, effect, instance);

        let tier = u64::from(apply.amplifier) + 1;
        let seconds = apply.duration_ticks / TICKS_PER_SECOND;
        info!(
            "Applied {} {tier} ({:?}) to {} for {} ticks",
            effect.id, effect.category, caller.name, apply.duration_ticks
        );
        Ok(Some(StatusMessage::effect_applied(
            self.registry.display_name(effect),
            tier,
            seconds,
        )))
    }

    fn clear_effect<H: EffectHost + ?Sized>(
        &self,
        clear: ClearSingleEffect,
        caller: &Caller,
        host: &mut H,
    ) -> Result<Option<StatusMessage>, Denial> {
        let Some(effect) = self.resolve(&clear.effect_id, caller)? else {
            return Ok(None);
        };

        host.remove_effect(caller, effect);
        info!("Removed {} from {}", effect.id, caller.name);
        Ok(Some(StatusMessage::effect_cleared(
            self.registry.display_name(effect),
        )))
    }

    /// Look up an effect, applying the unknown-id policy on a miss.
    fn resolve(&self, id: &Identifier, caller: &Caller) -> Result<Option<&EffectDefinition>, Denial> {
        match self.registry.lookup(id) {
            Some(effect) => Ok(Some(effect)),
            None => match self.policy {
                UnknownEffectPolicy::Silent => {
                    debug!("Ignoring unknown effect {id} from {}", caller.name);
                    Ok(None)
                }
                UnknownEffectPolicy::Deny => {
                    debug!("{} denied: unknown effect {id}", caller.name);
                    Err(Denial::unknown_effect(id.clone()))
                }
            },
        }
    }
}
