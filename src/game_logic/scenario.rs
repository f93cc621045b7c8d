use crate::game_logic::battlefield::{Battlefield, Structure};
use crate::game_logic::world::{
    BuildingKind, CharacterKind, StructureId, TargetCategory, WorldQuery,
};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Handles of everything placed by [`standard_defenses`]
#[derive(Debug, Clone, PartialEq)]
pub struct DefenseLayout {
    pub crystal: StructureId,
    pub walls: Vec<StructureId>,
    pub defenders: Vec<StructureId>,
}

/// A Crystal behind an arc of walls facing +x, with one breach in the middle,
/// plus a handful of characters and buildings
pub fn standard_defenses(field: &mut Battlefield, center: Vec2) -> DefenseLayout {
    let crystal = field.add_structure(Structure::new(
        "crystal",
        TargetCategory::Crystal,
        center,
        40.0,
        5000.0,
    ));

    let walls = (-6..=6)
        .filter(|step| *step != 0)
        .map(|step| {
            let angle = (step as f32 * 10.0).to_radians();
            field.add_structure(Structure::new(
                "wall",
                TargetCategory::Wall,
                center + Vec2::from_angle(angle) * 220.0,
                18.0,
                400.0,
            ))
        })
        .collect();

    let placements = [
        ("archer", TargetCategory::Character(CharacterKind::Ranged), Vec2::new(-80.0, 60.0), 12.0, 150.0),
        ("knight", TargetCategory::Character(CharacterKind::Melee), Vec2::new(150.0, 0.0), 14.0, 250.0),
        ("cleric", TargetCategory::Character(CharacterKind::Support), Vec2::new(-80.0, -60.0), 12.0, 120.0),
        ("north tower", TargetCategory::Building(BuildingKind::Tower), Vec2::new(120.0, 140.0), 24.0, 800.0),
        ("south tower", TargetCategory::Building(BuildingKind::Tower), Vec2::new(120.0, -140.0), 24.0, 800.0),
        ("great hall", TargetCategory::Building(BuildingKind::Hall), Vec2::new(-160.0, 0.0), 36.0, 1200.0),
        ("war tree", TargetCategory::Building(BuildingKind::WarTree), Vec2::new(0.0, 180.0), 30.0, 600.0),
    ];
    let defenders = placements
        .into_iter()
        .map(|(label, category, offset, radius, health)| {
            field.add_structure(Structure::new(label, category, center + offset, radius, health))
        })
        .collect();

    DefenseLayout {
        crystal,
        walls,
        defenders,
    }
}

/// Deterministic ring placement around a staging point
///
/// A prime-like angular multiplier spreads consecutive indices apart, and the
/// square root pushes later indices toward the rim.
pub fn ring_spawn_position(center: Vec2, radius: f32, index: u32, count: u32) -> Vec2 {
    let angle = (index as f32 * 2.3) % TAU;
    let distance_factor = (index as f32 / count.max(1) as f32).sqrt();
    let distance = radius * (0.3 + 0.7 * distance_factor);
    center + Vec2::from_angle(angle) * distance
}

pub fn jitter<R: Rng>(rng: &mut R, position: Vec2, amount: f32) -> Vec2 {
    if amount <= 0.0 {
        return position;
    }
    position + Vec2::new(rng.gen_range(-amount..amount), rng.gen_range(-amount..amount))
}

/// Every standing character and tower fires once at the nearest live hostile
/// in range. Returns the number of hits.
pub fn defender_volley(field: &mut Battlefield, damage: f32, range: f32) -> usize {
    let shooters: Vec<Vec2> = field
        .structures()
        .filter(|(_, structure)| {
            structure.is_alive()
                && matches!(
                    structure.category,
                    TargetCategory::Character(_) | TargetCategory::Building(BuildingKind::Tower)
                )
        })
        .map(|(_, structure)| structure.position)
        .collect();

    let mut hits = 0;
    for shooter in shooters {
        let Some(target) = field.find_nearest_of_category(shooter, TargetCategory::Hostile, range) else {
            continue;
        };
        if field.damage_target(target.handle, damage) {
            hits += 1;
        }
    }
    hits
}
