use crate::game_logic::actor::BuffableStats;
use crate::resources::{GamePhase, GameSettings};
use bevy::prelude::*;
use std::fmt;

/// Generational handle of a hostile actor. A handle whose generation no longer
/// matches its slot resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId {
    pub index: u32,
    pub generation: u32,
}

/// Generational handle of a defender-side structure or unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hostile#{}v{}", self.index, self.generation)
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "structure#{}v{}", self.index, self.generation)
    }
}

/// Anything a hostile can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetRef {
    Structure(StructureId),
    Hostile(ActorId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Structure(id) => write!(f, "{id}"),
            TargetRef::Hostile(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    Ranged,
    Melee,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    WarTree,
    Hall,
    Tower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetCategory {
    Crystal,
    Wall,
    Character(CharacterKind),
    Building(BuildingKind),
    Hostile,
}

impl TargetCategory {
    /// Character sub-kinds in scan order; earlier kinds win distance ties
    pub const CHARACTERS: [TargetCategory; 3] = [
        TargetCategory::Character(CharacterKind::Ranged),
        TargetCategory::Character(CharacterKind::Melee),
        TargetCategory::Character(CharacterKind::Support),
    ];

    pub const BUILDINGS: [TargetCategory; 3] = [
        TargetCategory::Building(BuildingKind::WarTree),
        TargetCategory::Building(BuildingKind::Hall),
        TargetCategory::Building(BuildingKind::Tower),
    ];

    /// Lower is preferred. Hostiles are never targeted.
    pub fn priority(self) -> Option<f32> {
        match self {
            TargetCategory::Crystal => Some(1.0),
            TargetCategory::Wall => Some(1.5),
            TargetCategory::Character(_) => Some(3.0),
            TargetCategory::Building(_) => Some(4.0),
            TargetCategory::Hostile => None,
        }
    }
}

/// Point-in-time view of a target as reported by the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub handle: TargetRef,
    pub category: TargetCategory,
    pub position: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl TargetSnapshot {
    pub fn distance_to(&self, position: Vec2) -> f32 {
        self.position.distance(position)
    }

    /// Distance from `position` to this target's edge, never negative
    pub fn edge_distance(&self, position: Vec2) -> f32 {
        (self.distance_to(position) - self.radius).max(0.0)
    }
}

/// Spatial and mutation queries the hostile core needs from the host world
pub trait WorldQuery {
    fn find_by_category(&self, category: TargetCategory) -> Vec<TargetSnapshot>;

    /// Nearest live target of a category whose center lies within `max_range`
    fn find_nearest_of_category(
        &self,
        position: Vec2,
        category: TargetCategory,
        max_range: f32,
    ) -> Option<TargetSnapshot> {
        self.find_by_category(category)
            .into_iter()
            .filter(|target| target.alive && target.distance_to(position) <= max_range)
            .min_by(|a, b| a.distance_to(position).total_cmp(&b.distance_to(position)))
    }

    /// Current view of a handle, or None once it has been destroyed or reused
    fn resolve(&self, handle: TargetRef) -> Option<TargetSnapshot>;

    /// Apply damage to a target; false when the target is gone
    fn damage_target(&mut self, handle: TargetRef, amount: f32) -> bool;

    /// Mutable access to a hostile's buffable stats
    fn buffable_stats_mut(&mut self, actor: ActorId) -> Option<&mut BuffableStats>;

    /// Toggle the visual "buffed" marker on a hostile
    fn set_buff_marker(&mut self, actor: ActorId, active: bool);
}

pub trait GameStateProvider {
    fn phase(&self) -> GamePhase;
}

impl GameStateProvider for GamePhase {
    fn phase(&self) -> GamePhase {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    Idle,
    Walk,
    Attack,
    Stagger,
    Buff,
    Special,
    Death,
}

pub trait AnimationPresenter {
    fn play(&mut self, actor: Option<ActorId>, clip: AnimationClip, duration: f32);
}

pub trait AudioSink {
    fn play_sfx(&mut self, clip_id: &str);
}

pub trait RewardSink {
    fn add_gold(&mut self, amount: u32);
    fn add_experience(&mut self, amount: u32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub actor: Option<ActorId>,
    pub clip: AnimationClip,
    pub duration: f32,
}

/// Buffered animation requests, drained by the presentation layer
#[derive(Resource, Debug, Default)]
pub struct AnimationQueue {
    pub requests: Vec<AnimationRequest>,
}

impl AnimationPresenter for AnimationQueue {
    fn play(&mut self, actor: Option<ActorId>, clip: AnimationClip, duration: f32) {
        self.requests.push(AnimationRequest {
            actor,
            clip,
            duration,
        });
    }
}

/// Buffered sound effect ids
#[derive(Resource, Debug, Default)]
pub struct SfxQueue {
    pub played: Vec<String>,
}

impl AudioSink for SfxQueue {
    fn play_sfx(&mut self, clip_id: &str) {
        self.played.push(clip_id.to_string());
    }
}

/// Running gold and experience totals
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Treasury {
    pub gold: u64,
    pub experience: u64,
}

impl RewardSink for Treasury {
    fn add_gold(&mut self, amount: u32) {
        self.gold += u64::from(amount);
    }

    fn add_experience(&mut self, amount: u32) {
        self.experience += u64::from(amount);
    }
}

/// Presentation and reward collaborators, bundled for a whole tick
pub struct Sinks<'a> {
    pub animation: &'a mut dyn AnimationPresenter,
    pub audio: &'a mut dyn AudioSink,
    pub rewards: &'a mut dyn RewardSink,
}

/// Everything one actor update may touch
pub struct TickContext<'a> {
    pub world: &'a mut dyn WorldQuery,
    pub game_state: &'a dyn GameStateProvider,
    pub sinks: Sinks<'a>,
    pub settings: &'a GameSettings,
}
