//! Built-in effect registry with the vanilla Java-edition status effects.

use potion_rs_proto::types::Identifier;

use crate::host::{EffectCategory, EffectDefinition, EffectRegistry};

use crate::host::EffectCategory::{Beneficial, Harmful, Neutral};

/// Vanilla effects: (path in the `minecraft` namespace, display name, category).
const VANILLA: &[(&str, &str, EffectCategory)] = &[
    ("speed", "Speed", Beneficial),
    ("slowness", "Slowness", Harmful),
    ("haste", "Haste", Beneficial),
    ("mining_fatigue", "Mining Fatigue", Harmful),
    ("strength", "Strength", Beneficial),
    ("instant_health", "Instant Health", Beneficial),
    ("instant_damage", "Instant Damage", Harmful),
    ("jump_boost", "Jump Boost", Beneficial),
    ("nausea", "Nausea", Harmful),
    ("regeneration", "Regeneration", Beneficial),
    ("resistance", "Resistance", Beneficial),
    ("fire_resistance", "Fire Resistance", Beneficial),
    ("water_breathing", "Water Breathing", Beneficial),
    ("invisibility", "Invisibility", Beneficial),
    ("blindness", "Blindness", Harmful),
    ("night_vision", "Night Vision", Beneficial),
    ("hunger", "Hunger", Harmful),
    ("weakness", "Weakness", Harmful),
    ("poison", "Poison", Harmful),
    ("wither", "Wither", Harmful),
    ("health_boost", "Health Boost", Beneficial),
    ("absorption", "Absorption", Beneficial),
    ("saturation", "Saturation", Beneficial),
    ("glowing", "Glowing", Neutral),
    ("levitation", "Levitation", Harmful),
    ("luck", "Luck", Beneficial),
    ("unluck", "Bad Luck", Harmful),
    ("slow_falling", "Slow Falling", Beneficial),
    ("conduit_power", "Conduit Power", Beneficial),
    ("dolphins_grace", "Dolphin's Grace", Beneficial),
    ("bad_omen", "Bad Omen", Neutral),
    ("hero_of_the_village", "Hero of the Village", Beneficial),
    ("darkness", "Darkness", Harmful),
    ("trial_omen", "Trial Omen", Neutral),
    ("raid_omen", "Raid Omen", Neutral),
    ("wind_charged", "Wind Charged", Harmful),
    ("weaving", "Weaving", Harmful),
    ("oozing", "Oozing", Harmful),
    ("infested", "Infested", Harmful),
];

/// Registry of known effect kinds.
pub struct VanillaEffects {
    effects: Vec<EffectDefinition>,
}

impl Default for VanillaEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl VanillaEffects {
    /// Build the registry with every vanilla effect.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .effects
            .extend(VANILLA.iter().filter_map(|&(path, name, category)| {
                Identifier::vanilla(path).ok().map(|id| EffectDefinition {
                    id,
                    display_name: name.to_string(),
                    category,
                })
            }));
        registry
    }

    /// Registry with no effects, for hosts that only want custom ones.
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// All known effect definitions.
    pub fn all(&self) -> &[EffectDefinition] {
        &self.effects
    }

    /// Register a custom effect. Replaces an existing one with the same id.
    pub fn register_effect(&mut self, def: EffectDefinition) {
        self.effects.retain(|e| e.id != def.id);
        self.effects.push(def);
    }
}

impl EffectRegistry for VanillaEffects {
    fn lookup(&self, id: &Identifier) -> Option<&EffectDefinition> {
        self.effects.iter().find(|e| &e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn has_all_vanilla_effects() {
        let reg = VanillaEffects::new();
        assert_eq!(reg.all().len(), VANILLA.len());
        assert_eq!(reg.all().len(), 39);
    }

    #[test]
    fn lookup_known() {
        let reg = VanillaEffects::new();
        let speed = reg.lookup(&id("minecraft:speed")).unwrap();
        assert_eq!(speed.display_name, "Speed");
        assert_eq!(speed.category, EffectCategory::Beneficial);
        assert_eq!(reg.display_name(speed), "Speed");
    }

    #[test]
    fn lookup_bare_path() {
        let reg = VanillaEffects::new();
        assert!(reg.lookup(&id("night_vision")).is_some());
    }

    #[test]
    fn lookup_unknown() {
        let reg = VanillaEffects::new();
        assert!(reg.lookup(&id("minecraft:flying")).is_none());
        assert!(reg.lookup(&id("ns:speed")).is_none());
    }

    #[test]
    fn register_custom_effect() {
        let mut reg = VanillaEffects::empty();
        reg.register_effect(EffectDefinition {
            id: id("ns:speed"),
            display_name: "Custom Speed".into(),
            category: EffectCategory::Beneficial,
        });
        reg.register_effect(EffectDefinition {
            id: id("ns:speed"),
            display_name: "Faster".into(),
            category: EffectCategory::Beneficial,
        });
        assert_eq!(reg.all().len(), 1);
        assert_eq!(reg.lookup(&id("ns:speed")).unwrap().display_name, "Faster");
    }
}
