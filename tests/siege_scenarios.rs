use bevy::prelude::*;
use siegeline::config::range_types::Seconds;
use siegeline::game_logic::scenario::{defender_volley, ring_spawn_position, standard_defenses};
use siegeline::game_logic::{
    ActorId, ActorPool, AnimationQueue, Battlefield, CombatState, SfxQueue, Sinks, TickSummary,
    Treasury,
};
use siegeline::resources::{GamePhase, GameSettings};

const DT: f32 = 1.0 / 60.0;

struct Siege {
    field: Battlefield,
    pool: ActorPool,
    animations: AnimationQueue,
    sfx: SfxQueue,
    treasury: Treasury,
    settings: GameSettings,
}

impl Siege {
    fn new(settings: GameSettings) -> Self {
        let mut field = Battlefield::new();
        standard_defenses(&mut field, Vec2::ZERO);
        Self {
            field,
            pool: ActorPool::new(settings.pool_capacity),
            animations: AnimationQueue::default(),
            sfx: SfxQueue::default(),
            treasury: Treasury::default(),
            settings,
        }
    }

    fn spawn_wave(&mut self, size: u32) -> Vec<ActorId> {
        let staging = Vec2::new(800.0, 0.0);
        (0..size)
            .map(|index| {
                let profile = self.settings.profiles[index as usize % self.settings.profiles.len()].clone();
                let position = ring_spawn_position(staging, 120.0, index, size);
                self.field.spawn(&mut self.pool, &profile, &self.settings, position)
            })
            .collect()
    }

    fn tick(&mut self, phase: GamePhase) -> TickSummary {
        let mut sinks = Sinks {
            animation: &mut self.animations,
            audio: &mut self.sfx,
            rewards: &mut self.treasury,
        };
        self.field.tick(DT, &phase, &mut sinks, &mut self.pool, &self.settings)
    }

    fn positions(&self) -> Vec<Vec2> {
        self.field.hostiles().map(|(_, actor)| actor.position()).collect()
    }
}

fn quick_corpses() -> GameSettings {
    GameSettings {
        corpse_linger: Seconds::new(0.5),
        ..GameSettings::default()
    }
}

#[test]
fn full_siege_closes_in_and_pays_out() {
    let mut siege = Siege::new(quick_corpses());
    let wave = siege.spawn_wave(8);
    let crystal_position = siege.field.crystal().map(|(_, crystal)| crystal.position).unwrap();
    let start_gap: f32 = siege
        .positions()
        .iter()
        .map(|position| position.distance(crystal_position))
        .fold(f32::MAX, f32::min);

    let mut closest = start_gap;
    let mut retired = 0;
    for frame in 0..3600 {
        if frame % 10 == 0 {
            defender_volley(&mut siege.field, 50.0, 160.0);
        }
        retired += siege.tick(GamePhase::Playing).retired;
        for position in siege.positions() {
            closest = closest.min(position.distance(crystal_position));
        }
    }

    assert!(closest < start_gap - 200.0);
    assert!(siege.treasury.gold > 0);
    assert!(retired > 0);
    assert!(!siege.sfx.played.is_empty());
    assert!(!siege.animations.requests.is_empty());
    assert!(wave.iter().any(|id| siege.field.hostile(*id).is_none()));
}

#[test]
fn pause_freezes_hostiles_but_not_corpses() {
    let mut siege = Siege::new(quick_corpses());
    let wave = siege.spawn_wave(4);
    for _ in 0..30 {
        siege.tick(GamePhase::Playing);
    }

    // One corpse settles before the pause begins
    siege.field.damage_hostile(wave[0], 1_000_000.0).unwrap();
    siege.tick(GamePhase::Playing);
    let gold = siege.treasury.gold;
    assert!(gold > 0);

    let before = siege.positions();
    let clocks: Vec<f32> = wave[1..]
        .iter()
        .map(|id| siege.field.hostile(*id).unwrap().clock())
        .collect();

    let mut frozen = 0;
    let mut retired = 0;
    for _ in 0..60 {
        let summary = siege.tick(GamePhase::Paused);
        frozen = summary.frozen;
        retired += summary.retired;
    }

    assert_eq!(frozen, 3);
    assert_eq!(retired, 1);
    assert!(siege.field.hostile(wave[0]).is_none());
    for (id, clock) in wave[1..].iter().zip(clocks) {
        assert_eq!(siege.field.hostile(*id).unwrap().clock(), clock);
    }
    let after = siege.positions();
    assert!(before[1..].iter().all(|position| after.contains(position)));
    assert_eq!(siege.treasury.gold, gold);
}

#[test]
fn later_waves_reuse_pooled_hostiles() {
    let mut siege = Siege::new(quick_corpses());

    for round in 0..3 {
        let wave = siege.spawn_wave(6);
        for id in &wave {
            siege.field.damage_hostile(*id, 1_000_000.0).unwrap();
        }
        for _ in 0..60 {
            siege.tick(GamePhase::Playing);
        }
        assert_eq!(siege.field.hostile_count(), 0, "round {round} left hostiles behind");
    }

    let stats = siege.pool.stats();
    assert_eq!(stats.misses, 6);
    assert_eq!(stats.hits, 12);
    assert_eq!(stats.releases, 18);
    assert_eq!(stats.discarded, 0);

    let fresh = siege.spawn_wave(6);
    for id in fresh {
        let actor = siege.field.hostile(id).unwrap();
        assert_eq!(actor.state(), CombatState::Idle);
        assert!(actor.health().is_full());
        assert!(actor.attachments().is_empty());
    }
}
