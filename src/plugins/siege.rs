use crate::config::load_config;
use crate::game_logic::scenario::{ring_spawn_position, standard_defenses};
use crate::game_logic::{ActorPool, AnimationQueue, Battlefield, SfxQueue, Sinks, Treasury};
use crate::resources::*;
use bevy::prelude::*;

pub struct SiegePlugin;

impl Plugin for SiegePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(load_config());
        }
        let pool_capacity = app.world().resource::<GameConfig>().settings.pool_capacity;

        app.init_state::<GamePhase>()
            .init_resource::<Battlefield>()
            .insert_resource(ActorPool::new(pool_capacity))
            .init_resource::<Treasury>()
            .init_resource::<SfxQueue>()
            .init_resource::<AnimationQueue>()
            .init_resource::<WaveSchedule>()
            .add_systems(Startup, seed_defenses)
            .add_systems(
                Update,
                (
                    spawn_waves.run_if(in_state(GamePhase::Playing)),
                    tick_battlefield,
                    drain_presentation,
                    detect_outcome.run_if(in_state(GamePhase::Playing)),
                )
                    .chain(),
            );
    }
}

/// Wave pacing: the next wave arrives once the field has no live hostiles
#[derive(Resource, Debug, Clone)]
pub struct WaveSchedule {
    pub wave: u32,
    pub wave_size: u32,
    pub max_waves: Option<u32>,
    pub staging: Vec2,
    pub spread: f32,
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self {
            wave: 0,
            wave_size: 8,
            max_waves: None,
            staging: Vec2::new(800.0, 0.0),
            spread: 120.0,
        }
    }
}

impl WaveSchedule {
    pub fn exhausted(&self) -> bool {
        self.max_waves.is_some_and(|max| self.wave >= max)
    }
}

fn seed_defenses(mut field: ResMut<Battlefield>) {
    if field.crystal().is_some() {
        return;
    }
    let layout = standard_defenses(&mut field, Vec2::ZERO);
    info!(
        "Defenses ready: {} walls, {} defenders",
        layout.walls.len(),
        layout.defenders.len()
    );
}

fn spawn_waves(
    mut schedule: ResMut<WaveSchedule>,
    mut field: ResMut<Battlefield>,
    mut pool: ResMut<ActorPool>,
    config: Res<GameConfig>,
) {
    if field.live_hostile_count() > 0 || schedule.exhausted() {
        return;
    }
    let profiles = &config.settings.profiles;
    if profiles.is_empty() {
        return;
    }

    schedule.wave += 1;
    for index in 0..schedule.wave_size {
        // Rotate archetypes so every wave mixes types
        let profile = &profiles[(index + schedule.wave) as usize % profiles.len()];
        let position = ring_spawn_position(schedule.staging, schedule.spread, index, schedule.wave_size);
        field.spawn(&mut *pool, profile, &config.settings, position);
    }
    info!("Wave {} arrives with {} hostiles", schedule.wave, schedule.wave_size);
}

#[allow(clippy::too_many_arguments)]
fn tick_battlefield(
    time: Res<Time>,
    phase: Res<State<GamePhase>>,
    config: Res<GameConfig>,
    mut field: ResMut<Battlefield>,
    mut pool: ResMut<ActorPool>,
    mut animations: ResMut<AnimationQueue>,
    mut sfx: ResMut<SfxQueue>,
    mut treasury: ResMut<Treasury>,
) {
    let mut sinks = Sinks {
        animation: &mut *animations,
        audio: &mut *sfx,
        rewards: &mut *treasury,
    };
    let summary = field.tick(
        time.delta_secs(),
        phase.get(),
        &mut sinks,
        &mut *pool,
        &config.settings,
    );
    if summary.retired > 0 {
        debug!("Retired {} hostiles this frame", summary.retired);
    }
}

fn drain_presentation(mut animations: ResMut<AnimationQueue>, mut sfx: ResMut<SfxQueue>) {
    for request in animations.requests.drain(..) {
        debug!("animation {:?} for {:?} over {:.2}s", request.clip, request.actor, request.duration);
    }
    for sound in sfx.played.drain(..) {
        debug!("sfx {}", sound);
    }
}

fn detect_outcome(
    field: Res<Battlefield>,
    schedule: Res<WaveSchedule>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    if field.crystal_destroyed() {
        warn!("The Crystal has fallen");
        next_phase.set(GamePhase::Defeat);
    } else if schedule.exhausted() && field.live_hostile_count() == 0 {
        info!("All {} waves repelled", schedule.wave);
        next_phase.set(GamePhase::Victory);
    }
}
