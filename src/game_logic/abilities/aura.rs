use super::{Ability, AbilityKind, CasterInfo};
use crate::config::range_types::{BuffEffect, DetectionRadius, Seconds};
use crate::game_logic::actor::BuffableStats;
use crate::game_logic::world::{ActorId, TargetCategory, TargetRef, WorldQuery};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    pub range: DetectionRadius,
    pub effect: BuffEffect,
    pub duration: Seconds,
    pub cooldown: Seconds,
    pub cast_duration: Seconds,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            range: DetectionRadius::new(200.0),
            effect: BuffEffect::new(0.3),
            duration: Seconds::new(6.0),
            cooldown: Seconds::new(12.0),
            cast_duration: Seconds::new(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BuffEntry {
    expires_at: f32,
    saved: BuffableStats,
    applied: BuffableStats,
}

/// Area buff on nearby hostiles. Every buffed ally is tracked in a ledger so
/// its stats are restored exactly once: on expiry, when it disappears, or when
/// the caster dies.
#[derive(Debug)]
pub struct AuraAbility {
    config: AuraConfig,
    ledger: BTreeMap<ActorId, BuffEntry>,
}

impl AuraAbility {
    pub fn new(config: AuraConfig) -> Self {
        Self {
            config,
            ledger: BTreeMap::new(),
        }
    }

    pub fn is_buffing(&self, actor: ActorId) -> bool {
        self.ledger.contains_key(&actor)
    }

    pub fn buffed_count(&self) -> usize {
        self.ledger.len()
    }

    fn revert(&self, actor: ActorId, entry: &BuffEntry, world: &mut dyn WorldQuery) {
        if let Some(stats) = world.buffable_stats_mut(actor) {
            if *stats == entry.applied {
                *stats = entry.saved;
            } else {
                // Another buff landed on top; divide ours out instead
                *stats = stats.without_factor(self.config.effect.factor());
            }
        }
        world.set_buff_marker(actor, false);
    }
}

impl Ability for AuraAbility {
    fn name(&self) -> &'static str {
        "rally_aura"
    }

    fn kind(&self) -> AbilityKind {
        AbilityKind::Buff
    }

    fn cooldown(&self) -> f32 {
        self.config.cooldown.get()
    }

    fn cast_duration(&self) -> f32 {
        self.config.cast_duration.get()
    }

    fn sfx(&self) -> Option<&'static str> {
        Some("war_cry")
    }

    fn release(&mut self, caster: &CasterInfo, world: &mut dyn WorldQuery) {
        let range = self.config.range.get();
        let factor = self.config.effect.factor();
        let expires_at = caster.now + self.config.duration.get();

        let candidates: Vec<ActorId> = world
            .find_by_category(TargetCategory::Hostile)
            .into_iter()
            .filter(|target| target.alive && target.distance_to(caster.position) <= range)
            .filter_map(|target| match target.handle {
                TargetRef::Hostile(id) => Some(id),
                TargetRef::Structure(_) => None,
            })
            .filter(|id| Some(*id) != caster.handle && !self.ledger.contains_key(id))
            .collect();

        for id in candidates {
            let Some(stats) = world.buffable_stats_mut(id) else {
                continue;
            };
            let saved = *stats;
            let applied = saved.with_factor(factor);
            *stats = applied;
            world.set_buff_marker(id, true);
            self.ledger.insert(
                id,
                BuffEntry {
                    expires_at,
                    saved,
                    applied,
                },
            );
            debug!("{} buffed {} until {:.2}", self.name(), id, expires_at);
        }
    }

    fn maintain(&mut self, now: f32, world: &mut dyn WorldQuery) {
        let finished: Vec<ActorId> = self
            .ledger
            .iter()
            .filter(|(id, entry)| {
                let present = world
                    .resolve(TargetRef::Hostile(**id))
                    .is_some_and(|target| target.alive);
                !present || now >= entry.expires_at
            })
            .map(|(id, _)| *id)
            .collect();

        for id in finished {
            if let Some(entry) = self.ledger.remove(&id) {
                self.revert(id, &entry, world);
            }
        }
    }

    fn on_caster_death(&mut self, world: &mut dyn WorldQuery) {
        let ledger = std::mem::take(&mut self.ledger);
        for (id, entry) in &ledger {
            self.revert(*id, entry, world);
        }
        if !ledger.is_empty() {
            debug!("{} released {} buffed allies", self.name(), ledger.len());
        }
    }

    fn reset(&mut self) {
        self.ledger.clear();
    }
}
