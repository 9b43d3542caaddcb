//! In-memory player state: the reference [`EffectHost`].
//!
//! Each connected player has a game mode and a list of active effects.
//! Status messages queue in an outbox until the connection handler flushes
//! them to the owning session.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use potion_rs_command::{Caller, CallerId, DisplayFlags, EffectDefinition, EffectHost, EffectInstance};
use potion_rs_proto::payloads::StatusMessage;
use potion_rs_proto::types::Identifier;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "survival" | "0" => Ok(Self::Survival),
            "creative" | "1" => Ok(Self::Creative),
            "adventure" | "2" => Ok(Self::Adventure),
            "spectator" | "3" => Ok(Self::Spectator),
            other => Err(format!("unknown gamemode: {other}")),
        }
    }
}

/// A status effect currently running on a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffect {
    pub effect_id: Identifier,
    pub amplifier: u32,
    pub remaining_ticks: u32,
    pub flags: DisplayFlags,
}

impl fmt::Display for ActiveEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} level {} ({} ticks left",
            self.effect_id,
            u64::from(self.amplifier) + 1,
            self.remaining_ticks
        )?;
        if !self.flags.show_particles {
            f.write_str(", no particles")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub name: String,
    pub gamemode: GameMode,
    pub effects: Vec<ActiveEffect>,
}

/// All online players, keyed by connection id.
#[derive(Default)]
pub struct PlayerStore {
    players: HashMap<CallerId, PlayerState>,
    outbox: Vec<(CallerId, StatusMessage)>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, id: CallerId, name: impl Into<String>, gamemode: GameMode) {
        self.players.insert(
            id,
            PlayerState {
                name: name.into(),
                gamemode,
                effects: Vec::new(),
            },
        );
    }

    pub fn leave(&mut self, id: CallerId) -> Option<PlayerState> {
        self.outbox.retain(|(to, _)| *to != id);
        self.players.remove(&id)
    }

    pub fn get(&self, id: CallerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Take every queued status message.
    pub fn drain_outbox(&mut self) -> Vec<(CallerId, StatusMessage)> {
        std::mem::take(&mut self.outbox)
    }

    /// Advance effect timers by one tick. Returns the effects that ran out.
    pub fn tick(&mut self) -> Vec<(String, ActiveEffect)> {
        let mut expired = Vec::new();
        for PlayerState { name, effects, .. } in self.players.values_mut() {
            effects.retain_mut(|e| {
                e.remaining_ticks = e.remaining_ticks.saturating_sub(1);
                if e.remaining_ticks > 0 {
                    return true;
                }
                expired.push((name.clone(), e.clone()));
                false
            });
        }
        expired
    }
}

impl EffectHost for PlayerStore {
    fn is_elevated(&self, caller: CallerId) -> bool {
        self.players
            .get(&caller)
            .is_some_and(|p| p.gamemode == GameMode::Creative)
    }

    fn apply_effect(&mut self, caller: &Caller, effect: &EffectDefinition, instance: EffectInstance) {
        let Some(player) = self.players.get_mut(&caller.id) else {
            return;
        };
        // Replace existing effect of same type
        player.effects.retain(|e| e.effect_id != effect.id);
        player.effects.push(ActiveEffect {
            effect_id: effect.id.clone(),
            amplifier: instance.amplifier,
            remaining_ticks: instance.duration_ticks,
            flags: instance.flags,
        });
    }

    fn remove_effect(&mut self, caller: &Caller, effect: &EffectDefinition) {
        if let Some(player) = self.players.get_mut(&caller.id) {
            player.effects.retain(|e| e.effect_id != effect.id);
        }
    }

    fn clear_all_effects(&mut self, caller: &Caller) {
        if let Some(player) = self.players.get_mut(&caller.id) {
            player.effects.clear();
        }
    }

    fn send_message(&mut self, caller: &Caller, message: StatusMessage) {
        debug!("-> {}: {message}", caller.name);
        self.outbox.push((caller.id, message));
    }
}
