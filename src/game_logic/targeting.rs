use crate::game_logic::actor::HostileActor;
use crate::game_logic::movement::{PathPlan, plan_path};
use crate::game_logic::world::{TargetCategory, TargetRef, TargetSnapshot, WorldQuery};
use crate::resources::NavigationSettings;
use bevy::prelude::*;

/// Why a target won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    CrystalInRange,
    BlockingWall,
    WallFallback,
    Character,
    Building,
    DefaultCrystal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub target: TargetRef,
    pub reason: SelectionReason,
}

/// A handle is worth keeping while it resolves to something alive
pub fn is_valid(world: &dyn WorldQuery, handle: TargetRef) -> bool {
    world.resolve(handle).is_some_and(|target| target.alive)
}

pub fn revalidate(world: &dyn WorldQuery, current: Option<TargetRef>) -> Option<TargetRef> {
    current.filter(|handle| is_valid(world, *handle))
}

pub fn live_walls(world: &dyn WorldQuery) -> Vec<TargetSnapshot> {
    world
        .find_by_category(TargetCategory::Wall)
        .into_iter()
        .filter(|wall| wall.alive)
        .collect()
}

/// Nearest live target across several categories. On an exact distance tie
/// the category listed first wins.
pub fn nearest_in_group(
    world: &dyn WorldQuery,
    position: Vec2,
    group: &[TargetCategory],
    max_range: f32,
) -> Option<TargetSnapshot> {
    let mut best: Option<(f32, TargetSnapshot)> = None;
    for category in group {
        if let Some(found) = world.find_nearest_of_category(position, *category, max_range) {
            let distance = found.distance_to(position);
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, found));
            }
        }
    }
    best.map(|(_, target)| target)
}

/// Distance short of a target's center at which an approach is finished
pub fn approach_distance(actor: &HostileActor, target: &TargetSnapshot) -> f32 {
    actor.stats().attack_range + target.radius
}

/// Pick what this actor should go after, in priority order:
/// the Crystal when it is close, a wall that seals the Crystal off, the
/// nearest wall if an earlier detour failed, the nearest character, the
/// nearest building, and finally the Crystal wherever it is.
pub fn select_target(
    actor: &HostileActor,
    world: &dyn WorldQuery,
    nav: &NavigationSettings,
) -> Option<Selection> {
    let position = actor.position();
    let detection = actor.stats().detection_radius;
    let crystal = actor
        .crystal
        .and_then(|handle| world.resolve(handle))
        .filter(|crystal| crystal.alive);

    if let Some(crystal) = crystal {
        let in_detection = crystal.distance_to(position) <= detection;
        if in_detection && actor.in_attack_range(&crystal) {
            return Some(Selection {
                target: crystal.handle,
                reason: SelectionReason::CrystalInRange,
            });
        }

        let walls = live_walls(world);
        let plan = plan_path(
            position,
            crystal.position,
            approach_distance(actor, &crystal),
            &walls,
            actor.navigation().detour_side,
            nav,
        );

        // A sealing wall only competes once it is itself within detection
        if let PathPlan::NoDetour { wall } = plan {
            let wall_in_detection = world
                .resolve(wall)
                .is_some_and(|wall| wall.alive && wall.distance_to(position) <= detection);
            if wall_in_detection {
                return Some(Selection {
                    target: wall,
                    reason: SelectionReason::BlockingWall,
                });
            }
        }

        if in_detection {
            return Some(Selection {
                target: crystal.handle,
                reason: SelectionReason::CrystalInRange,
            });
        }
    }

    // Walls only become targets of opportunity once steering has given up
    if revalidate(world, actor.navigation().blocked_by).is_some() {
        if let Some(wall) = world.find_nearest_of_category(position, TargetCategory::Wall, detection) {
            return Some(Selection {
                target: wall.handle,
                reason: SelectionReason::WallFallback,
            });
        }
    }

    if let Some(character) = nearest_in_group(world, position, &TargetCategory::CHARACTERS, detection) {
        return Some(Selection {
            target: character.handle,
            reason: SelectionReason::Character,
        });
    }

    if let Some(building) = nearest_in_group(world, position, &TargetCategory::BUILDINGS, detection) {
        return Some(Selection {
            target: building.handle,
            reason: SelectionReason::Building,
        });
    }

    crystal.map(|crystal| Selection {
        target: crystal.handle,
        reason: SelectionReason::DefaultCrystal,
    })
}
