use crate::config::range_types::*;
use crate::game_logic::abilities::{AbilitySpec, AuraConfig, ShockwaveConfig};
use crate::game_logic::errors::{SiegeError, SiegeResult};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub settings: GameSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
// NOTE: When adding new fields, keep Default in sync so older config files still load
pub struct GameSettings {
    // Playable area; every committed move is clamped into it
    pub arena: ArenaBounds,

    pub navigation: NavigationSettings,
    pub stagger: StaggerSettings,

    // Lifecycle
    pub corpse_linger: Seconds,
    pub pool_capacity: usize,

    // Hostile archetypes, looked up by type key
    pub profiles: Vec<ActorProfile>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            navigation: NavigationSettings::default(),
            stagger: StaggerSettings::default(),
            corpse_linger: Seconds::new(60.0),
            pool_capacity: 32,
            profiles: vec![
                ActorProfile::warlord(),
                ActorProfile::siege_brute(),
                ActorProfile::war_shaman(),
                ActorProfile::raider(),
            ],
        }
    }
}

impl GameSettings {
    /// Look up a hostile archetype by its pool type key
    pub fn profile(&self, type_key: &str) -> SiegeResult<&ActorProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.type_key == type_key)
            .ok_or_else(|| SiegeError::UnknownHostileType {
                type_key: type_key.to_string(),
            })
    }

    /// Validate every profile, reporting the first failure with field details
    pub fn validate_profiles(&self) -> SiegeResult<()> {
        for profile in &self.profiles {
            profile.check()?;
        }
        Ok(())
    }
}

/// Axis-aligned playable screen bounds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ArenaBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl ArenaBounds {
    pub fn rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min_x: -960.0,
            min_y: -540.0,
            max_x: 960.0,
            max_y: 540.0,
        }
    }
}

/// Steering and detour constants
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NavigationSettings {
    /// Spacing of wall-proximity samples along the straight path
    pub sample_step: f32,
    /// Extra clearance added to a wall's radius when sampling
    pub wall_buffer: f32,
    /// Lateral offsets tried, in order, on each side of a blocked path
    pub detour_offsets: Vec<f32>,
    /// Avoidance looks this many collision radii out
    pub avoidance_range_factor: f32,
    /// Repulsion strength once two bodies already overlap
    pub overlap_strength: f32,
    pub blend_min: f32,
    pub blend_max: f32,
    pub blend_overlap: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            sample_step: 50.0,
            wall_buffer: 20.0,
            detour_offsets: vec![30.0, 50.0, 80.0],
            avoidance_range_factor: 4.0,
            overlap_strength: 2.0,
            blend_min: 0.3,
            blend_max: 0.7,
            blend_overlap: 0.85,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct StaggerSettings {
    /// Damage older than this (since the previous hit) no longer counts
    pub damage_window: f32,
    /// Minimum time between two staggers
    pub cooldown: f32,
}

impl Default for StaggerSettings {
    fn default() -> Self {
        Self {
            damage_window: 1.0,
            cooldown: 2.0,
        }
    }
}

/// One hostile archetype. The four boss variants differ only by these numbers
/// and by their ability list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
pub struct ActorProfile {
    #[validate(length(min = 1, max = 64))]
    pub type_key: String,
    pub recyclable: bool,

    pub max_health: HealthValue,
    pub move_speed: MoveSpeed,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub attack_damage: f32,
    #[validate(range(min = 0.1, max = 30.0))]
    pub attack_interval: f32,
    pub attack_range: AttackRange,
    pub tenacity: Tenacity,
    pub collision_radius: CollisionRadius,
    pub detection_radius: DetectionRadius,

    // Animation lengths drive the midpoint side effects
    pub attack_animation: Seconds,
    pub stagger_duration: Seconds,
    pub death_animation: Seconds,

    /// Casts cannot be broken by stagger
    pub uninterruptible_casts: bool,

    #[validate(range(max = 100000))]
    pub gold: u32,
    #[validate(range(max = 100000))]
    pub experience: u32,

    #[validate(length(max = 8))]
    pub abilities: Vec<AbilitySpec>,
}

impl Default for ActorProfile {
    fn default() -> Self {
        Self::warlord()
    }
}

impl ActorProfile {
    /// Base boss: melee bruiser with a self/ally rally aura
    pub fn warlord() -> Self {
        Self {
            type_key: "warlord".to_string(),
            recyclable: true,
            max_health: HealthValue::new(600.0),
            move_speed: MoveSpeed::new(45.0),
            attack_damage: 30.0,
            attack_interval: 1.6,
            attack_range: AttackRange::new(45.0),
            tenacity: Tenacity::new(0.3),
            collision_radius: CollisionRadius::new(22.0),
            detection_radius: DetectionRadius::new(200.0),
            attack_animation: Seconds::new(0.8),
            stagger_duration: Seconds::new(0.6),
            death_animation: Seconds::new(1.2),
            uninterruptible_casts: true,
            gold: 50,
            experience: 40,
            abilities: vec![AbilitySpec::Aura(AuraConfig::default())],
        }
    }

    /// Slow wall-breaker with a ground-slam special
    pub fn siege_brute() -> Self {
        Self {
            type_key: "siege_brute".to_string(),
            max_health: HealthValue::new(900.0),
            move_speed: MoveSpeed::new(30.0),
            attack_damage: 55.0,
            attack_interval: 2.4,
            attack_range: AttackRange::new(50.0),
            tenacity: Tenacity::new(0.5),
            collision_radius: CollisionRadius::new(28.0),
            attack_animation: Seconds::new(1.1),
            gold: 80,
            experience: 60,
            abilities: vec![AbilitySpec::Shockwave(ShockwaveConfig::default())],
            ..Self::warlord()
        }
    }

    /// Ranged caster whose aura reaches further and lasts longer
    pub fn war_shaman() -> Self {
        Self {
            type_key: "war_shaman".to_string(),
            max_health: HealthValue::new(400.0),
            move_speed: MoveSpeed::new(50.0),
            attack_damage: 18.0,
            attack_interval: 1.2,
            attack_range: AttackRange::new(120.0),
            tenacity: Tenacity::new(0.2),
            collision_radius: CollisionRadius::new(18.0),
            gold: 45,
            experience: 35,
            abilities: vec![AbilitySpec::Aura(AuraConfig {
                range: DetectionRadius::new(320.0),
                effect: BuffEffect::new(0.45),
                duration: Seconds::new(8.0),
                cooldown: Seconds::new(14.0),
                cast_duration: Seconds::new(1.2),
            })],
            ..Self::warlord()
        }
    }

    /// Fast fodder without abilities; staggers on any hit
    pub fn raider() -> Self {
        Self {
            type_key: "raider".to_string(),
            max_health: HealthValue::new(120.0),
            move_speed: MoveSpeed::new(90.0),
            attack_damage: 10.0,
            attack_interval: 0.9,
            attack_range: AttackRange::new(30.0),
            tenacity: Tenacity::new(0.0),
            collision_radius: CollisionRadius::new(14.0),
            attack_animation: Seconds::new(0.5),
            stagger_duration: Seconds::new(0.4),
            uninterruptible_casts: false,
            gold: 5,
            experience: 4,
            abilities: Vec::new(),
            ..Self::warlord()
        }
    }

    /// Run field validation and fold the errors into a readable message
    pub fn check(&self) -> SiegeResult<()> {
        self.validate().map_err(|validation_errors| {
            let details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", messages.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            SiegeError::InvalidProfile {
                reason: format!("{}: {details}", self.type_key),
            }
        })
    }
}

/// Overall play state as seen by every hostile
#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    Victory,
    Defeat,
}
