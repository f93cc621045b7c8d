pub mod aura;
pub mod shockwave;

pub use aura::{AuraAbility, AuraConfig};
pub use shockwave::{ShockwaveAbility, ShockwaveConfig};

use crate::game_logic::world::{ActorId, WorldQuery};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Buffs take precedence over specials when both are ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    Buff,
    Special,
}

/// What an ability knows about its caster at release time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasterInfo {
    pub handle: Option<ActorId>,
    pub position: Vec2,
    pub now: f32,
}

/// A timed cast owned by one hostile. The state machine plays the cast
/// animation and calls `release` once at its midpoint.
pub trait Ability: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn kind(&self) -> AbilityKind;
    fn cooldown(&self) -> f32;
    fn cast_duration(&self) -> f32;

    fn sfx(&self) -> Option<&'static str> {
        None
    }

    fn release(&mut self, caster: &CasterInfo, world: &mut dyn WorldQuery);

    /// Per-tick upkeep while play is running
    fn maintain(&mut self, _now: f32, _world: &mut dyn WorldQuery) {}

    /// Undo anything still applied to other actors
    fn on_caster_death(&mut self, _world: &mut dyn WorldQuery) {}

    /// Drop internal bookkeeping when the caster is recycled
    fn reset(&mut self) {}
}

/// Serializable ability description used by actor profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilitySpec {
    Aura(AuraConfig),
    Shockwave(ShockwaveConfig),
}

impl AbilitySpec {
    pub fn build(&self) -> Box<dyn Ability> {
        match self {
            AbilitySpec::Aura(config) => Box::new(AuraAbility::new(config.clone())),
            AbilitySpec::Shockwave(config) => Box::new(ShockwaveAbility::new(config.clone())),
        }
    }
}

/// An ability plus its cooldown timer
#[derive(Debug)]
pub struct AbilitySlot {
    pub ability: Box<dyn Ability>,
    pub timer: f32,
}

impl AbilitySlot {
    pub fn new(ability: Box<dyn Ability>) -> Self {
        Self { ability, timer: 0.0 }
    }

    pub fn is_ready(&self) -> bool {
        self.timer >= self.ability.cooldown()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builds_matching_ability() {
        let aura = AbilitySpec::Aura(AuraConfig::default()).build();
        assert_eq!(aura.kind(), AbilityKind::Buff);
        assert_eq!(aura.name(), "rally_aura");

        let slam = AbilitySpec::Shockwave(ShockwaveConfig::default()).build();
        assert_eq!(slam.kind(), AbilityKind::Special);
    }

    #[test]
    fn test_slot_readiness() {
        let mut slot = AbilitySlot::new(AbilitySpec::Aura(AuraConfig::default()).build());
        assert!(!slot.is_ready());
        slot.timer = slot.ability.cooldown();
        assert!(slot.is_ready());
    }

    #[test]
    fn test_spec_toml_is_tagged() {
        #[derive(Deserialize)]
        struct Probe {
            abilities: Vec<AbilitySpec>,
        }

        let probe: Probe = toml::from_str(
            "[[abilities]]\nkind = \"shockwave\"\nradius = 90.0\ndamage = 40.0\n",
        )
        .unwrap();
        match &probe.abilities[0] {
            AbilitySpec::Shockwave(config) => {
                assert_eq!(config.radius.get(), 90.0);
                assert_eq!(config.damage, 40.0);
            }
            other => panic!("unexpected ability {other:?}"),
        }
    }
}
