use crate::components::{Facing, HealthPool};
use crate::game_logic::abilities::{AbilityKind, AbilitySlot};
use crate::game_logic::movement::DetourSide;
use crate::game_logic::stagger::StaggerGate;
use crate::game_logic::world::{
    ActorId, AnimationClip, TargetCategory, TargetRef, TargetSnapshot,
};
use crate::resources::{ActorProfile, GameSettings};
use bevy::prelude::*;

/// The stats an aura is allowed to touch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuffableStats {
    pub move_speed: f32,
    pub attack_damage: f32,
    pub attack_interval: f32,
}

impl BuffableStats {
    /// Faster, harder and more frequent by `factor`
    pub fn with_factor(self, factor: f32) -> Self {
        Self {
            move_speed: self.move_speed * factor,
            attack_damage: self.attack_damage * factor,
            attack_interval: self.attack_interval / factor,
        }
    }

    pub fn without_factor(self, factor: f32) -> Self {
        Self {
            move_speed: self.move_speed / factor,
            attack_damage: self.attack_damage / factor,
            attack_interval: self.attack_interval * factor,
        }
    }
}

/// Runtime numbers for one actor, copied out of its profile on spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatStats {
    pub max_health: f32,
    pub attack_range: f32,
    pub detection_radius: f32,
    pub collision_radius: f32,
    pub tenacity: f32,
    pub attack_animation: f32,
    pub stagger_duration: f32,
    pub death_animation: f32,
    pub buffable: BuffableStats,
}

impl From<&ActorProfile> for CombatStats {
    fn from(profile: &ActorProfile) -> Self {
        Self {
            max_health: profile.max_health.get(),
            attack_range: profile.attack_range.get(),
            detection_radius: profile.detection_radius.get(),
            collision_radius: profile.collision_radius.get(),
            tenacity: profile.tenacity.get(),
            attack_animation: profile.attack_animation.get(),
            stagger_duration: profile.stagger_duration.get(),
            death_animation: profile.death_animation.get(),
            buffable: BuffableStats {
                move_speed: profile.move_speed.get(),
                attack_damage: profile.attack_damage,
                attack_interval: profile.attack_interval,
            },
        }
    }
}

/// Externally visible combat state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatState {
    Idle,
    Walking,
    Attacking,
    Staggered,
    Buffing,
    SpecialAbility,
    Dying,
    Pooled,
}

impl CombatState {
    pub fn clip(self) -> Option<AnimationClip> {
        match self {
            CombatState::Idle => Some(AnimationClip::Idle),
            CombatState::Walking => Some(AnimationClip::Walk),
            CombatState::Attacking => Some(AnimationClip::Attack),
            CombatState::Staggered => Some(AnimationClip::Stagger),
            CombatState::Buffing => Some(AnimationClip::Buff),
            CombatState::SpecialAbility => Some(AnimationClip::Special),
            CombatState::Dying => Some(AnimationClip::Death),
            CombatState::Pooled => None,
        }
    }
}

/// An attack animation in flight; damage lands once at the midpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Swing {
    pub target: TargetRef,
    pub elapsed: f32,
    pub duration: f32,
    pub struck: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    Idle,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Recoil {
    pub elapsed: f32,
    pub duration: f32,
    pub resume: Resume,
}

/// An ability cast in flight. `resume` holds the engagement the cast
/// pre-empted, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cast {
    pub slot: usize,
    pub kind: AbilityKind,
    pub elapsed: f32,
    pub duration: f32,
    pub released: bool,
    pub resume: Option<TargetRef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Corpse {
    pub elapsed: f32,
    pub settled: bool,
}

/// The state machine proper; each state carries its own timers
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Activity {
    Idle,
    Walking,
    Attacking(Swing),
    Staggered(Recoil),
    Casting(Cast),
    Dying(Corpse),
    Pooled,
}

impl Activity {
    pub fn state(&self) -> CombatState {
        match self {
            Activity::Idle => CombatState::Idle,
            Activity::Walking => CombatState::Walking,
            Activity::Attacking(_) => CombatState::Attacking,
            Activity::Staggered(_) => CombatState::Staggered,
            Activity::Casting(cast) => match cast.kind {
                AbilityKind::Buff => CombatState::Buffing,
                AbilityKind::Special => CombatState::SpecialAbility,
            },
            Activity::Dying(_) => CombatState::Dying,
            Activity::Pooled => CombatState::Pooled,
        }
    }
}

/// Things stuck to an actor by the defenders; stripped on recycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Arrow,
    Debuff,
    StatusMarker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub remaining: f32,
}

/// Detour memory carried between ticks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Navigation {
    /// Side of the last successful detour, tried first next time
    pub detour_side: Option<DetourSide>,
    /// Wall that blocked the path with no way around it
    pub blocked_by: Option<TargetRef>,
}

#[derive(Debug)]
pub struct HostileActor {
    pub(crate) type_key: String,
    pub(crate) recyclable: bool,
    pub(crate) handle: Option<ActorId>,
    pub(crate) position: Vec2,
    pub(crate) profile: ActorProfile,
    pub(crate) stats: CombatStats,
    pub(crate) health: HealthPool,
    pub(crate) current_target: Option<TargetRef>,
    pub(crate) crystal: Option<TargetRef>,
    pub(crate) attack_timer: f32,
    pub(crate) clock: f32,
    pub(crate) stagger: StaggerGate,
    pub(crate) abilities: Vec<AbilitySlot>,
    pub(crate) activity: Activity,
    pub(crate) facing: Facing,
    pub(crate) attachments: Vec<Attachment>,
    pub(crate) navigation: Navigation,
    pub(crate) buff_marker: bool,
    pub(crate) pending_clip: Option<(AnimationClip, f32)>,
}

impl HostileActor {
    /// Fresh instance in Idle, not yet registered with any world
    pub fn new(profile: &ActorProfile, settings: &GameSettings, position: Vec2) -> Self {
        let stats = CombatStats::from(profile);
        Self {
            type_key: profile.type_key.clone(),
            recyclable: profile.recyclable,
            handle: None,
            position,
            profile: profile.clone(),
            stats,
            health: HealthPool::new_full(stats.max_health),
            current_target: None,
            crystal: None,
            attack_timer: 0.0,
            clock: 0.0,
            stagger: StaggerGate::new(stats.tenacity, settings.stagger),
            abilities: profile
                .abilities
                .iter()
                .map(|spec| AbilitySlot::new(spec.build()))
                .collect(),
            activity: Activity::Idle,
            facing: Facing::default(),
            attachments: Vec::new(),
            navigation: Navigation::default(),
            buff_marker: false,
            pending_clip: None,
        }
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn is_recyclable(&self) -> bool {
        self.recyclable
    }

    pub fn handle(&self) -> Option<ActorId> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: Option<ActorId>) {
        self.handle = handle;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn state(&self) -> CombatState {
        self.activity.state()
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.activity, Activity::Dying(_) | Activity::Pooled) && !self.health.is_dead()
    }

    pub fn health(&self) -> HealthPool {
        self.health
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn buffable(&self) -> BuffableStats {
        self.stats.buffable
    }

    pub fn buffable_mut(&mut self) -> &mut BuffableStats {
        &mut self.stats.buffable
    }

    pub fn current_target(&self) -> Option<TargetRef> {
        self.current_target
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Local play time; only advances while the game is Playing
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    pub fn ability_timers(&self) -> Vec<f32> {
        self.abilities.iter().map(|slot| slot.timer).collect()
    }

    pub fn navigation(&self) -> Navigation {
        self.navigation
    }

    pub fn stagger_gate(&self) -> &StaggerGate {
        &self.stagger
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn attach(&mut self, kind: AttachmentKind, duration: f32) {
        self.attachments.push(Attachment {
            kind,
            remaining: duration,
        });
    }

    pub fn is_buff_marked(&self) -> bool {
        self.buff_marker
    }

    pub fn set_buff_marker(&mut self, active: bool) {
        self.buff_marker = active;
    }

    /// How the world sees this actor
    pub fn snapshot(&self, handle: ActorId) -> TargetSnapshot {
        TargetSnapshot {
            handle: TargetRef::Hostile(handle),
            category: TargetCategory::Hostile,
            position: self.position,
            radius: self.stats.collision_radius,
            alive: self.is_alive(),
        }
    }

    /// Edge distance check against the current attack range, inclusive
    pub fn in_attack_range(&self, target: &TargetSnapshot) -> bool {
        target.edge_distance(self.position) <= self.stats.attack_range
    }

    pub(crate) fn tick_attachments(&mut self, dt: f32) {
        for attachment in &mut self.attachments {
            attachment.remaining -= dt;
        }
        self.attachments.retain(|attachment| attachment.remaining > 0.0);
    }
}
