use crate::components::Facing;
use crate::game_logic::abilities::AbilitySlot;
use crate::game_logic::actor::{Activity, CombatStats, HostileActor, Navigation};
use crate::game_logic::stagger::StaggerGate;
use crate::game_logic::world::WorldQuery;
use crate::resources::{ActorProfile, GameSettings};
use bevy::prelude::*;
use std::collections::HashMap;

/// Recycles dormant hostiles by type key
pub trait ObjectPool {
    fn acquire(&mut self, type_key: &str) -> Option<HostileActor>;
    fn release(&mut self, actor: HostileActor, type_key: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub hits: u64,
    pub misses: u64,
    pub releases: u64,
    pub discarded: u64,
}

/// Bucketed pool with a per-type cap; overflow is dropped
#[derive(Resource, Debug)]
pub struct ActorPool {
    buckets: HashMap<String, Vec<HostileActor>>,
    capacity: usize,
    stats: PoolStats,
}

impl Default for ActorPool {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ActorPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: HashMap::new(),
            capacity,
            stats: PoolStats::default(),
        }
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn idle_count(&self, type_key: &str) -> usize {
        self.buckets.get(type_key).map_or(0, Vec::len)
    }
}

impl ObjectPool for ActorPool {
    fn acquire(&mut self, type_key: &str) -> Option<HostileActor> {
        let actor = self.buckets.get_mut(type_key).and_then(Vec::pop);
        if actor.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        actor
    }

    fn release(&mut self, actor: HostileActor, type_key: &str) {
        let bucket = self.buckets.entry(type_key.to_string()).or_default();
        if bucket.len() >= self.capacity {
            self.stats.discarded += 1;
            return;
        }
        bucket.push(actor);
        self.stats.releases += 1;
    }
}

impl HostileActor {
    /// Prepare a pooled or freshly built actor for a new life
    pub fn on_acquire(&mut self, profile: &ActorProfile, settings: &GameSettings, world: &dyn WorldQuery) {
        if profile.abilities != self.profile.abilities {
            self.abilities = profile
                .abilities
                .iter()
                .map(|spec| AbilitySlot::new(spec.build()))
                .collect();
        }
        self.type_key = profile.type_key.clone();
        self.recyclable = profile.recyclable;
        self.profile = profile.clone();
        self.stagger = StaggerGate::new(profile.tenacity.get(), settings.stagger);

        self.reset_transient();
        self.activity = Activity::Idle;
        self.refresh_crystal(world);
    }

    /// Undo everything the actor's abilities still hold on others, then strip
    /// and park it. Safe to call more than once.
    pub fn on_release(&mut self, world: &mut dyn WorldQuery) {
        if matches!(self.activity, Activity::Pooled) {
            return;
        }
        for slot in &mut self.abilities {
            slot.ability.on_caster_death(world);
        }
        self.reset_transient();
        self.activity = Activity::Pooled;
    }

    fn reset_transient(&mut self) {
        self.stats = CombatStats::from(&self.profile);
        self.health.reset_to(self.stats.max_health);
        self.handle = None;
        self.current_target = None;
        self.crystal = None;
        self.attack_timer = 0.0;
        self.clock = 0.0;
        self.stagger.reset();
        for slot in &mut self.abilities {
            slot.ability.reset();
            slot.timer = 0.0;
        }
        self.facing = Facing::default();
        self.attachments.clear();
        self.navigation = Navigation::default();
        self.buff_marker = false;
        self.pending_clip = None;
    }
}

/// Take an actor of the profile's type from the pool, building one on a miss
pub fn spawn_hostile(
    pool: &mut dyn ObjectPool,
    profile: &ActorProfile,
    settings: &GameSettings,
    position: Vec2,
    world: &dyn WorldQuery,
) -> HostileActor {
    let mut actor = match pool.acquire(&profile.type_key) {
        Some(actor) => actor,
        None => {
            debug!("pool miss for {}, building a new actor", profile.type_key);
            HostileActor::new(profile, settings, position)
        }
    };
    actor.on_acquire(profile, settings, world);
    actor.set_position(position);
    actor
}

/// Park the actor and hand it to its pool, or drop it if it is single-use
pub fn retire_hostile(pool: &mut dyn ObjectPool, mut actor: HostileActor, world: &mut dyn WorldQuery) {
    actor.on_release(world);

    if actor.is_recyclable() {
        let type_key = actor.type_key().to_string();
        pool.release(actor, &type_key);
    } else {
        debug!("{} is not recyclable, dropping it", actor.type_key());
    }
}
