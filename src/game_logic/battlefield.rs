use crate::components::{Damage, HealthPool};
use crate::game_logic::actor::{BuffableStats, HostileActor};
use crate::game_logic::combat::{DamageOutcome, TickOutcome};
use crate::game_logic::errors::{SiegeError, SiegeResult};
use crate::game_logic::lifecycle::{ObjectPool, retire_hostile, spawn_hostile};
use crate::game_logic::world::{
    ActorId, GameStateProvider, Sinks, StructureId, TargetCategory, TargetRef, TargetSnapshot,
    TickContext, WorldQuery,
};
use crate::resources::{ActorProfile, GameSettings};
use bevy::prelude::*;

/// A defender-side body: the Crystal, a wall, a character or a building
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub label: String,
    pub category: TargetCategory,
    pub position: Vec2,
    pub radius: f32,
    pub health: HealthPool,
}

impl Structure {
    pub fn new(label: &str, category: TargetCategory, position: Vec2, radius: f32, max_health: f32) -> Self {
        Self {
            label: label.to_string(),
            category,
            position,
            radius,
            health: HealthPool::new_full(max_health),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

fn insert_slot<T>(slots: &mut Vec<Slot<T>>, value: T) -> (u32, u32) {
    if let Some(index) = slots.iter().position(|slot| slot.value.is_none()) {
        slots[index].value = Some(value);
        return (index as u32, slots[index].generation);
    }
    slots.push(Slot {
        generation: 0,
        value: Some(value),
    });
    ((slots.len() - 1) as u32, 0)
}

fn slot_ref<T>(slots: &[Slot<T>], index: u32, generation: u32) -> Option<&T> {
    slots
        .get(index as usize)
        .filter(|slot| slot.generation == generation)
        .and_then(|slot| slot.value.as_ref())
}

fn slot_mut<T>(slots: &mut [Slot<T>], index: u32, generation: u32) -> Option<&mut T> {
    slots
        .get_mut(index as usize)
        .filter(|slot| slot.generation == generation)
        .and_then(|slot| slot.value.as_mut())
}

/// Empty the slot and bump its generation so old handles go stale
fn take_slot<T>(slots: &mut [Slot<T>], index: u32, generation: u32) -> Option<T> {
    let slot = slots
        .get_mut(index as usize)
        .filter(|slot| slot.generation == generation)?;
    let value = slot.value.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    Some(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub active: usize,
    pub frozen: usize,
    pub dying: usize,
    pub retired: usize,
}

/// In-memory world that owns every structure and live hostile
#[derive(Resource, Debug, Default)]
pub struct Battlefield {
    structures: Vec<Slot<Structure>>,
    hostiles: Vec<Slot<HostileActor>>,
}

impl Battlefield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_structure(&mut self, structure: Structure) -> StructureId {
        let (index, generation) = insert_slot(&mut self.structures, structure);
        StructureId { index, generation }
    }

    pub fn remove_structure(&mut self, id: StructureId) -> Option<Structure> {
        take_slot(&mut self.structures, id.index, id.generation)
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        slot_ref(&self.structures, id.index, id.generation)
    }

    pub fn structures(&self) -> impl Iterator<Item = (StructureId, &Structure)> {
        self.structures.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|structure| {
                (
                    StructureId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    structure,
                )
            })
        })
    }

    pub fn crystal(&self) -> Option<(StructureId, &Structure)> {
        self.structures()
            .find(|(_, structure)| structure.category == TargetCategory::Crystal)
    }

    /// True once a Crystal was placed and none of them is still standing
    pub fn crystal_destroyed(&self) -> bool {
        let mut crystals = self
            .structures()
            .filter(|(_, structure)| structure.category == TargetCategory::Crystal)
            .peekable();
        crystals.peek().is_some() && crystals.all(|(_, crystal)| !crystal.is_alive())
    }

    pub fn insert_hostile(&mut self, actor: HostileActor) -> ActorId {
        let (index, generation) = insert_slot(&mut self.hostiles, actor);
        let id = ActorId { index, generation };
        if let Some(actor) = self.hostile_mut(id) {
            actor.set_handle(Some(id));
        }
        id
    }

    pub fn hostile(&self, id: ActorId) -> Option<&HostileActor> {
        slot_ref(&self.hostiles, id.index, id.generation)
    }

    pub fn hostile_mut(&mut self, id: ActorId) -> Option<&mut HostileActor> {
        slot_mut(&mut self.hostiles, id.index, id.generation)
    }

    /// Remove a hostile without returning it to any pool
    pub fn take_hostile(&mut self, id: ActorId) -> Option<HostileActor> {
        let mut actor = take_slot(&mut self.hostiles, id.index, id.generation)?;
        actor.set_handle(None);
        Some(actor)
    }

    pub fn hostiles(&self) -> impl Iterator<Item = (ActorId, &HostileActor)> {
        self.hostiles.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|actor| {
                (
                    ActorId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    actor,
                )
            })
        })
    }

    pub fn hostile_count(&self) -> usize {
        self.hostiles.iter().filter(|slot| slot.value.is_some()).count()
    }

    pub fn live_hostile_count(&self) -> usize {
        self.hostiles().filter(|(_, actor)| actor.is_alive()).count()
    }

    /// Pull a hostile of the profile's type from the pool and place it
    pub fn spawn(
        &mut self,
        pool: &mut dyn ObjectPool,
        profile: &ActorProfile,
        settings: &GameSettings,
        position: Vec2,
    ) -> ActorId {
        let actor = spawn_hostile(pool, profile, settings, position, &*self);
        let id = self.insert_hostile(actor);
        debug!("spawned {} as {}", profile.type_key, id);
        id
    }

    /// Damage from the defenders' side
    pub fn damage_hostile(&mut self, id: ActorId, amount: f32) -> SiegeResult<DamageOutcome> {
        let actor = self.hostile_mut(id).ok_or_else(|| SiegeError::StaleHandle {
            handle: id.to_string(),
        })?;
        let outcome = actor.take_damage(amount);
        if outcome == DamageOutcome::Killed {
            self.revert_caster_effects(id);
        }
        Ok(outcome)
    }

    // Buffs a caster granted end the moment it dies, not when its corpse settles
    fn revert_caster_effects(&mut self, id: ActorId) {
        let Some(actor) = self.hostile_mut(id) else {
            return;
        };
        let mut abilities = std::mem::take(&mut actor.abilities);
        for slot in &mut abilities {
            slot.ability.on_caster_death(self);
        }
        if let Some(actor) = self.hostile_mut(id) {
            actor.abilities = abilities;
        }
    }

    /// Update every hostile once. Each actor is lifted out of its slot for
    /// the duration of its own update, so it never sees itself in queries.
    pub fn tick(
        &mut self,
        dt: f32,
        game_state: &dyn GameStateProvider,
        sinks: &mut Sinks<'_>,
        pool: &mut dyn ObjectPool,
        settings: &GameSettings,
    ) -> TickSummary {
        let mut summary = TickSummary::default();

        for index in 0..self.hostiles.len() {
            let Some(mut actor) = self.hostiles[index].value.take() else {
                continue;
            };

            let outcome = {
                let mut ctx = TickContext {
                    world: &mut *self,
                    game_state,
                    sinks: Sinks {
                        animation: &mut *sinks.animation,
                        audio: &mut *sinks.audio,
                        rewards: &mut *sinks.rewards,
                    },
                    settings,
                };
                actor.update(dt, &mut ctx)
            };

            match outcome {
                TickOutcome::ReadyForRelease => {
                    let slot = &mut self.hostiles[index];
                    slot.generation = slot.generation.wrapping_add(1);
                    retire_hostile(pool, actor, self);
                    summary.retired += 1;
                }
                other => {
                    match other {
                        TickOutcome::Frozen => summary.frozen += 1,
                        TickOutcome::Dying => summary.dying += 1,
                        _ => summary.active += 1,
                    }
                    self.hostiles[index].value = Some(actor);
                }
            }
        }

        summary
    }
}

impl WorldQuery for Battlefield {
    fn find_by_category(&self, category: TargetCategory) -> Vec<TargetSnapshot> {
        if category == TargetCategory::Hostile {
            return self
                .hostiles()
                .map(|(id, actor)| actor.snapshot(id))
                .collect();
        }

        self.structures()
            .filter(|(_, structure)| structure.category == category)
            .map(|(id, structure)| structure_snapshot(id, structure))
            .collect()
    }

    fn resolve(&self, handle: TargetRef) -> Option<TargetSnapshot> {
        match handle {
            TargetRef::Structure(id) => self
                .structure(id)
                .map(|structure| structure_snapshot(id, structure)),
            TargetRef::Hostile(id) => self.hostile(id).map(|actor| actor.snapshot(id)),
        }
    }

    fn damage_target(&mut self, handle: TargetRef, amount: f32) -> bool {
        match handle {
            TargetRef::Structure(id) => {
                let Some(structure) = slot_mut(&mut self.structures, id.index, id.generation) else {
                    return false;
                };
                if !structure.is_alive() {
                    return false;
                }
                structure.health.take_damage(Damage::new(amount));
                if !structure.is_alive() {
                    info!("{} destroyed", structure.label);
                }
                true
            }
            TargetRef::Hostile(id) => self
                .damage_hostile(id, amount)
                .is_ok_and(|outcome| outcome != DamageOutcome::Ignored),
        }
    }

    fn buffable_stats_mut(&mut self, actor: ActorId) -> Option<&mut BuffableStats> {
        self.hostile_mut(actor).map(HostileActor::buffable_mut)
    }

    fn set_buff_marker(&mut self, actor: ActorId, active: bool) {
        if let Some(actor) = self.hostile_mut(actor) {
            actor.set_buff_marker(active);
        }
    }
}

fn structure_snapshot(id: StructureId, structure: &Structure) -> TargetSnapshot {
    TargetSnapshot {
        handle: TargetRef::Structure(id),
        category: structure.category,
        position: structure.position,
        radius: structure.radius,
        alive: structure.is_alive(),
    }
}
