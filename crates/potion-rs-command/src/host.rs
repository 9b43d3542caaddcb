//! Seams between the dispatcher and the game host.
//!
//! The host owns every player's active-effect set. The dispatcher never reads
//! or stores effect state; it only issues mutation requests through
//! [`EffectHost`] and resolves ids through [`EffectRegistry`].

use potion_rs_proto::payloads::StatusMessage;
use potion_rs_proto::types::Identifier;

/// Host-assigned id of a connected caller.
pub type CallerId = u64;

/// Permission level of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Standard,
    /// May apply and clear effects (creative mode in vanilla hosts).
    Elevated,
}

/// The sender of a command, as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: CallerId,
    pub name: String,
    pub authorization: Authorization,
}

impl Caller {
    pub fn new(id: CallerId, name: impl Into<String>, authorization: Authorization) -> Self {
        Self {
            id,
            name: name.into(),
            authorization,
        }
    }

    /// Build a caller whose authorization is read from the host right now.
    pub fn resolve<H: EffectHost + ?Sized>(id: CallerId, name: impl Into<String>, host: &H) -> Self {
        let authorization = if host.is_elevated(id) {
            Authorization::Elevated
        } else {
            Authorization::Standard
        };
        Self::new(id, name, authorization)
    }

    pub fn is_elevated(&self) -> bool {
        self.authorization == Authorization::Elevated
    }
}

/// How an effect instance is presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    pub ambient: bool,
    pub show_particles: bool,
    pub show_icon: bool,
}

impl DisplayFlags {
    /// Flags for remotely requested effects: no particles, HUD icon only.
    pub const REMOTE: Self = Self {
        ambient: false,
        show_particles: false,
        show_icon: true,
    };
}

/// Parameters of one applied effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectInstance {
    pub duration_ticks: u32,
    pub amplifier: u32,
    pub flags: DisplayFlags,
}

/// Whether an effect helps or hurts, for hosts that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCategory {
    Beneficial,
    Harmful,
    Neutral,
}

/// A registered effect kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDefinition {
    /// e.g. `minecraft:speed`.
    pub id: Identifier,
    /// e.g. `"Speed"`.
    pub display_name: String,
    pub category: EffectCategory,
}

/// Read-only lookup of effect kinds.
pub trait EffectRegistry {
    fn lookup(&self, id: &Identifier) -> Option<&EffectDefinition>;

    fn display_name(&self, effect: &EffectDefinition) -> String {
        effect.display_name.clone()
    }
}

/// Player state owned by the host.
pub trait EffectHost {
    /// Whether the caller may use the effect channel.
    fn is_elevated(&self, caller: CallerId) -> bool;

    /// Apply an effect, replacing any existing instance of the same kind.
    fn apply_effect(&mut self, caller: &Caller, effect: &EffectDefinition, instance: EffectInstance);

    fn remove_effect(&mut self, caller: &Caller, effect: &EffectDefinition);

    fn clear_all_effects(&mut self, caller: &Caller);

    /// Deliver a status message to the caller.
    fn send_message(&mut self, caller: &Caller, message: StatusMessage);
}
