use bevy::prelude::*;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use siegeline::config::{load_config, load_config_from};
use siegeline::game_logic::scenario::{defender_volley, jitter, ring_spawn_position, standard_defenses};
use siegeline::game_logic::{
    ActorPool, AnimationQueue, Battlefield, SfxQueue, Sinks, TickSummary, Treasury,
};
use siegeline::resources::{GameConfig, GamePhase};
use siegeline::SiegeResult;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "siege_sim")]
#[command(about = "Run a headless siege against the standard defenses and report the outcome")]
struct Args {
    /// Number of simulation frames
    #[arg(long, default_value = "12000")]
    frames: u32,

    /// Hostiles per wave
    #[arg(long, default_value = "12")]
    hostiles: u32,

    /// Random seed for spawn jitter
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Seconds per frame
    #[arg(long, default_value = "0.016666")]
    dt: f32,

    /// Settings file to use instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause the siege at this frame
    #[arg(long)]
    pause_at: Option<u32>,

    /// How many frames a pause lasts
    #[arg(long, default_value = "300")]
    pause_frames: u32,

    /// Damage each defender deals per volley
    #[arg(long, default_value = "6.0")]
    volley_damage: f32,

    /// Frames between defender volleys
    #[arg(long, default_value = "30")]
    volley_every: u32,
}

#[derive(Debug, Default)]
struct RunTotals {
    waves: u32,
    spawned: u32,
    retired: usize,
    volley_hits: usize,
    frozen_frames: u32,
}

fn main() -> SiegeResult<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    let settings = &config.settings;

    let mut rng = Pcg64::seed_from_u64(args.seed);
    let mut field = Battlefield::new();
    let mut pool = ActorPool::new(settings.pool_capacity);
    let mut animations = AnimationQueue::default();
    let mut sfx = SfxQueue::default();
    let mut treasury = Treasury::default();
    let mut totals = RunTotals::default();
    let mut last_summary = TickSummary::default();

    standard_defenses(&mut field, Vec2::ZERO);
    let staging = Vec2::new(settings.arena.max_x - 160.0, 0.0);

    for frame in 0..args.frames {
        let phase = phase_at(&args, frame);

        if phase == GamePhase::Playing && field.live_hostile_count() == 0 {
            spawn_wave(&args, &config, &mut field, &mut pool, &mut rng, staging, &mut totals);
        }

        if phase == GamePhase::Playing && frame % args.volley_every.max(1) == 0 {
            totals.volley_hits += defender_volley(&mut field, args.volley_damage, 160.0);
        }

        let mut sinks = Sinks {
            animation: &mut animations,
            audio: &mut sfx,
            rewards: &mut treasury,
        };
        last_summary = field.tick(args.dt, &phase, &mut sinks, &mut pool, settings);
        totals.retired += last_summary.retired;
        if phase == GamePhase::Paused {
            totals.frozen_frames += 1;
        }
        animations.requests.clear();
        sfx.played.clear();

        if field.crystal_destroyed() {
            println!("The Crystal fell on frame {}", frame);
            break;
        }
    }

    print_summary(&field, &pool, &treasury, &totals, &last_summary);
    Ok(())
}

fn phase_at(args: &Args, frame: u32) -> GamePhase {
    match args.pause_at {
        Some(start) if frame >= start && frame < start + args.pause_frames => GamePhase::Paused,
        _ => GamePhase::Playing,
    }
}

fn spawn_wave(
    args: &Args,
    config: &GameConfig,
    field: &mut Battlefield,
    pool: &mut ActorPool,
    rng: &mut Pcg64,
    staging: Vec2,
    totals: &mut RunTotals,
) {
    let profiles = &config.settings.profiles;
    if profiles.is_empty() {
        return;
    }
    totals.waves += 1;
    for index in 0..args.hostiles {
        let profile = &profiles[(index + totals.waves) as usize % profiles.len()];
        let position = jitter(rng, ring_spawn_position(staging, 140.0, index, args.hostiles), 8.0);
        field.spawn(pool, profile, &config.settings, position);
        totals.spawned += 1;
    }
}

fn print_summary(
    field: &Battlefield,
    pool: &ActorPool,
    treasury: &Treasury,
    totals: &RunTotals,
    last: &TickSummary,
) {
    let stats = pool.stats();
    println!("Siege summary:");
    println!("  Waves: {} ({} hostiles spawned)", totals.waves, totals.spawned);
    println!("  Retired: {}, volley hits: {}", totals.retired, totals.volley_hits);
    println!(
        "  Last frame: {} active, {} frozen, {} dying",
        last.active, last.frozen, last.dying
    );
    println!("  Frames spent paused: {}", totals.frozen_frames);
    println!("  Live hostiles: {}", field.live_hostile_count());
    println!("  Gold: {}, experience: {}", treasury.gold, treasury.experience);
    println!(
        "  Pool: {} hits, {} misses, {} releases, {} discarded",
        stats.hits, stats.misses, stats.releases, stats.discarded
    );
    match field.crystal() {
        Some((_, crystal)) => println!("  Crystal: {}", crystal.health),
        None => println!("  Crystal: missing"),
    }
}
