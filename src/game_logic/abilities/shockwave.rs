use super::{Ability, AbilityKind, CasterInfo};
use crate::config::range_types::{DetectionRadius, Seconds};
use crate::game_logic::world::{TargetCategory, WorldQuery};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveConfig {
    pub radius: DetectionRadius,
    pub damage: f32,
    pub cooldown: Seconds,
    pub cast_duration: Seconds,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            radius: DetectionRadius::new(120.0),
            damage: 80.0,
            cooldown: Seconds::new(15.0),
            cast_duration: Seconds::new(1.4),
        }
    }
}

/// Ground slam that hits every defender whose edge lies within the radius
#[derive(Debug)]
pub struct ShockwaveAbility {
    config: ShockwaveConfig,
}

impl ShockwaveAbility {
    pub fn new(config: ShockwaveConfig) -> Self {
        Self { config }
    }
}

impl Ability for ShockwaveAbility {
    fn name(&self) -> &'static str {
        "shockwave"
    }

    fn kind(&self) -> AbilityKind {
        AbilityKind::Special
    }

    fn cooldown(&self) -> f32 {
        self.config.cooldown.get()
    }

    fn cast_duration(&self) -> f32 {
        self.config.cast_duration.get()
    }

    fn sfx(&self) -> Option<&'static str> {
        Some("ground_slam")
    }

    fn release(&mut self, caster: &CasterInfo, world: &mut dyn WorldQuery) {
        let radius = self.config.radius.get();
        let categories = [TargetCategory::Crystal, TargetCategory::Wall]
            .into_iter()
            .chain(TargetCategory::CHARACTERS)
            .chain(TargetCategory::BUILDINGS);

        let hits: Vec<_> = categories
            .flat_map(|category| world.find_by_category(category))
            .filter(|target| target.alive && target.edge_distance(caster.position) <= radius)
            .map(|target| target.handle)
            .collect();

        for handle in &hits {
            world.damage_target(*handle, self.config.damage);
        }
        debug!("shockwave at {:?} hit {} defenders", caster.position, hits.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::abilities::test_world::StubWorld;
    use crate::game_logic::actor::BuffableStats;
    use crate::game_logic::world::{CharacterKind, TargetRef};

    #[test]
    fn test_hits_defenders_in_radius_only() {
        let mut world = StubWorld::default();
        let wall = world.add_structure(0, TargetCategory::Wall, Vec2::new(100.0, 0.0));
        let archer = world.add_structure(
            1,
            TargetCategory::Character(CharacterKind::Ranged),
            Vec2::new(0.0, 130.0),
        );
        let far = world.add_structure(2, TargetCategory::Crystal, Vec2::new(400.0, 0.0));
        let ally = world.add_hostile(3, Vec2::new(10.0, 0.0), BuffableStats::default());

        let mut slam = ShockwaveAbility::new(ShockwaveConfig::default());
        slam.release(
            &CasterInfo {
                handle: None,
                position: Vec2::ZERO,
                now: 0.0,
            },
            &mut world,
        );

        let hit: Vec<TargetRef> = world.damage.iter().map(|(handle, _)| *handle).collect();
        assert!(hit.contains(&wall));
        // 130 away with a radius of 20 puts the edge at 110
        assert!(hit.contains(&archer));
        assert!(!hit.contains(&far));
        assert!(!hit.contains(&TargetRef::Hostile(ally)));
        assert!(world.damage.iter().all(|(_, amount)| *amount == 80.0));
    }
}
