use crate::game_logic::world::{TargetRef, TargetSnapshot};
use crate::resources::NavigationSettings;
use bevy::prelude::*;

/// Which way a detour swings relative to the direct path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetourSide {
    Left,
    Right,
}

impl DetourSide {
    fn sign(self) -> f32 {
        match self {
            DetourSide::Left => 1.0,
            DetourSide::Right => -1.0,
        }
    }

    pub fn other(self) -> Self {
        match self {
            DetourSide::Left => DetourSide::Right,
            DetourSide::Right => DetourSide::Left,
        }
    }
}

/// Outcome of checking the straight line to a goal against walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPlan {
    Clear,
    Detour { waypoint: Vec2, side: DetourSide },
    NoDetour { wall: TargetRef },
}

/// First wall met along the straight path and the sample that hit it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blockage {
    pub sample: Vec2,
    pub wall: TargetSnapshot,
}

/// Sample the segment every `sample_step` units, starting one step out and
/// stopping `stop_short` before the goal. Returns the first blocked sample and
/// the nearest wall that blocks it.
pub fn find_blockage(
    from: Vec2,
    to: Vec2,
    stop_short: f32,
    walls: &[TargetSnapshot],
    nav: &NavigationSettings,
) -> Option<Blockage> {
    let delta = to - from;
    let direction = delta.normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }

    let step = nav.sample_step.max(1.0);
    let reach = delta.length() - stop_short;
    let mut travelled = step;

    while travelled <= reach {
        let sample = from + direction * travelled;
        let blocker = walls
            .iter()
            .filter(|wall| wall.alive && sample.distance(wall.position) < wall.radius + nav.wall_buffer)
            .min_by(|a, b| a.distance_to(from).total_cmp(&b.distance_to(from)));

        if let Some(wall) = blocker {
            return Some(Blockage {
                sample,
                wall: *wall,
            });
        }
        travelled += step;
    }

    None
}

fn collides_with_wall(point: Vec2, walls: &[TargetSnapshot], nav: &NavigationSettings) -> bool {
    walls
        .iter()
        .any(|wall| wall.alive && point.distance(wall.position) < wall.radius + nav.wall_buffer)
}

/// Decide whether the direct path is usable, and if not, find a waypoint
/// beside the blockage. Smaller offsets are tried first; at each offset the
/// preferred side goes first.
pub fn plan_path(
    from: Vec2,
    to: Vec2,
    stop_short: f32,
    walls: &[TargetSnapshot],
    preferred: Option<DetourSide>,
    nav: &NavigationSettings,
) -> PathPlan {
    let Some(blockage) = find_blockage(from, to, stop_short, walls, nav) else {
        return PathPlan::Clear;
    };

    let lateral = (to - from).normalize_or_zero().perp();
    let first = preferred.unwrap_or(DetourSide::Left);

    for magnitude in &nav.detour_offsets {
        for side in [first, first.other()] {
            let waypoint = blockage.sample + lateral * side.sign() * *magnitude;
            if !collides_with_wall(waypoint, walls, nav) {
                return PathPlan::Detour { waypoint, side };
            }
        }
    }

    PathPlan::NoDetour {
        wall: blockage.wall.handle,
    }
}

/// Summed repulsion from nearby bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avoidance {
    pub direction: Vec2,
    pub peak_strength: f32,
    pub overlapping: bool,
}

/// Repulsion from every live obstacle whose edge lies within
/// `avoidance_range_factor` collision radii. Bodies that already overlap push
/// with the fixed overlap strength.
pub fn calculate_avoidance(
    position: Vec2,
    radius: f32,
    obstacles: &[TargetSnapshot],
    nav: &NavigationSettings,
) -> Avoidance {
    let range = radius * nav.avoidance_range_factor;
    let mut force = Vec2::ZERO;
    let mut peak_strength: f32 = 0.0;
    let mut overlapping = false;

    for obstacle in obstacles.iter().filter(|o| o.alive) {
        let away = position - obstacle.position;
        let distance = away.length();
        if distance < 0.001 {
            continue;
        }

        let strength = if distance < radius + obstacle.radius {
            overlapping = true;
            nav.overlap_strength
        } else {
            let gap = distance - obstacle.radius;
            if gap >= range {
                continue;
            }
            1.0 - gap / range
        };

        force += away / distance * strength;
        peak_strength = peak_strength.max(strength);
    }

    Avoidance {
        direction: force.normalize_or_zero(),
        peak_strength,
        overlapping,
    }
}

/// How much of the avoidance direction to mix into the desired heading
pub fn blend_weight(avoidance: &Avoidance, nav: &NavigationSettings) -> f32 {
    if avoidance.overlapping {
        nav.blend_overlap
    } else {
        nav.blend_min + (nav.blend_max - nav.blend_min) * avoidance.peak_strength.min(1.0)
    }
}

pub fn clamp_to_bounds(position: Vec2, bounds: Rect) -> Vec2 {
    position.clamp(bounds.min, bounds.max)
}

/// Configuration for a single steering step
#[derive(Debug, Clone, Copy)]
pub struct SteeringInput<'a> {
    pub position: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub delta_time: f32,
    pub goal: Vec2,
    /// Distance from the goal at which the approach is complete
    pub stop_short: f32,
    pub walls: &'a [TargetSnapshot],
    /// Everything to steer around; must not contain the goal itself
    pub obstacles: &'a [TargetSnapshot],
    pub preferred_side: Option<DetourSide>,
    pub bounds: Rect,
}

/// Pure movement calculation that can be tested without the Bevy runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementCalculation {
    pub new_position: Vec2,
    pub direction: Vec2,
    pub should_move: bool,
    pub plan: PathPlan,
}

pub fn calculate_movement(input: &SteeringInput, nav: &NavigationSettings) -> MovementCalculation {
    let standing = |plan| MovementCalculation {
        new_position: input.position,
        direction: Vec2::ZERO,
        should_move: false,
        plan,
    };

    let plan = plan_path(
        input.position,
        input.goal,
        input.stop_short,
        input.walls,
        input.preferred_side,
        nav,
    );

    // With no way around, keep pressing along the straight line; the
    // selector switches to the blocking wall once it is within detection
    let aim = match plan {
        PathPlan::Clear | PathPlan::NoDetour { .. } => input.goal,
        PathPlan::Detour { waypoint, .. } => waypoint,
    };

    let to_aim = aim - input.position;
    let desired = to_aim.normalize_or_zero();
    if desired == Vec2::ZERO {
        return standing(plan);
    }

    let avoidance = calculate_avoidance(input.position, input.radius, input.obstacles, nav);
    let heading = if avoidance.direction == Vec2::ZERO {
        desired
    } else {
        let weight = blend_weight(&avoidance, nav);
        let blended = desired.lerp(avoidance.direction, weight).normalize_or_zero();
        if blended == Vec2::ZERO { desired } else { blended }
    };

    // Never overshoot the point we are steering for
    let travel = (input.speed * input.delta_time).min(to_aim.length());
    let new_position = clamp_to_bounds(input.position + heading * travel, input.bounds);

    MovementCalculation {
        new_position,
        direction: heading,
        should_move: true,
        plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::world::{StructureId, TargetCategory};

    fn wall(index: u32, position: Vec2, radius: f32) -> TargetSnapshot {
        TargetSnapshot {
            handle: TargetRef::Structure(StructureId {
                index,
                generation: 0,
            }),
            category: TargetCategory::Wall,
            position,
            radius,
            alive: true,
        }
    }

    fn arena() -> Rect {
        Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)
    }

    fn input<'a>(walls: &'a [TargetSnapshot], obstacles: &'a [TargetSnapshot]) -> SteeringInput<'a> {
        SteeringInput {
            position: Vec2::ZERO,
            radius: 16.0,
            speed: 60.0,
            delta_time: 0.5,
            goal: Vec2::new(400.0, 0.0),
            stop_short: 40.0,
            walls,
            obstacles,
            preferred_side: None,
            bounds: arena(),
        }
    }

    #[test]
    fn test_clear_path_moves_straight() {
        let nav = NavigationSettings::default();
        let result = calculate_movement(&input(&[], &[]), &nav);

        assert!(result.should_move);
        assert_eq!(result.plan, PathPlan::Clear);
        assert_eq!(result.new_position, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_single_wall_yields_detour() {
        let nav = NavigationSettings::default();
        let walls = [wall(0, Vec2::new(200.0, 0.0), 35.0)];

        let plan = plan_path(Vec2::ZERO, Vec2::new(400.0, 0.0), 40.0, &walls, None, &nav);

        // The sample at x=150 is the first inside radius plus buffer
        assert_eq!(
            plan,
            PathPlan::Detour {
                waypoint: Vec2::new(150.0, 30.0),
                side: DetourSide::Left,
            }
        );
    }

    #[test]
    fn test_preferred_side_tried_first() {
        let nav = NavigationSettings::default();
        let walls = [wall(0, Vec2::new(200.0, 0.0), 35.0)];

        let plan = plan_path(
            Vec2::ZERO,
            Vec2::new(400.0, 0.0),
            40.0,
            &walls,
            Some(DetourSide::Right),
            &nav,
        );

        assert_eq!(
            plan,
            PathPlan::Detour {
                waypoint: Vec2::new(150.0, -30.0),
                side: DetourSide::Right,
            }
        );
    }

    #[test]
    fn test_wall_line_has_no_detour() {
        let nav = NavigationSettings::default();
        let walls: Vec<_> = (-3..=3)
            .map(|i| wall((i + 3) as u32, Vec2::new(200.0, i as f32 * 40.0), 25.0))
            .collect();

        let plan = plan_path(Vec2::ZERO, Vec2::new(400.0, 0.0), 40.0, &walls, None, &nav);

        assert_eq!(plan, PathPlan::NoDetour { wall: walls[3].handle });

        // Still advances toward the goal and reports the blocker
        let result = calculate_movement(&input(&walls, &[]), &nav);
        assert!(result.should_move);
        assert_eq!(result.plan, PathPlan::NoDetour { wall: walls[3].handle });
        assert_eq!(result.new_position, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_wall_beyond_stop_distance_ignored() {
        let nav = NavigationSettings::default();
        // Sitting right at the goal, inside the stop-short band
        let walls = [wall(0, Vec2::new(390.0, 0.0), 20.0)];
        assert!(find_blockage(Vec2::ZERO, Vec2::new(400.0, 0.0), 40.0, &walls, &nav).is_none());
    }

    #[test]
    fn test_dead_walls_do_not_block() {
        let nav = NavigationSettings::default();
        let mut broken = wall(0, Vec2::new(200.0, 0.0), 35.0);
        broken.alive = false;
        assert_eq!(
            plan_path(Vec2::ZERO, Vec2::new(400.0, 0.0), 40.0, &[broken], None, &nav),
            PathPlan::Clear
        );
    }

    #[test]
    fn test_avoidance_strength_scales_with_distance() {
        let nav = NavigationSettings::default();
        // Range is 64; edge gap of 32 gives half strength
        let ally = wall(0, Vec2::new(40.0, 0.0), 8.0);

        let avoidance = calculate_avoidance(Vec2::ZERO, 16.0, &[ally], &nav);

        assert_eq!(avoidance.direction, Vec2::new(-1.0, 0.0));
        assert!((avoidance.peak_strength - 0.5).abs() < 1e-5);
        assert!(!avoidance.overlapping);
        assert!((blend_weight(&avoidance, &nav) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_overlap_forces_strong_blend() {
        let nav = NavigationSettings::default();
        let ally = wall(0, Vec2::new(0.0, 10.0), 16.0);

        let avoidance = calculate_avoidance(Vec2::ZERO, 16.0, &[ally], &nav);

        assert!(avoidance.overlapping);
        assert_eq!(avoidance.peak_strength, 2.0);
        assert_eq!(blend_weight(&avoidance, &nav), 0.85);
    }

    #[test]
    fn test_far_obstacles_ignored() {
        let nav = NavigationSettings::default();
        let far = wall(0, Vec2::new(200.0, 0.0), 10.0);
        let avoidance = calculate_avoidance(Vec2::ZERO, 16.0, &[far], &nav);
        assert_eq!(avoidance.direction, Vec2::ZERO);
        assert_eq!(blend_weight(&avoidance, &nav), 0.3);
    }

    #[test]
    fn test_avoidance_bends_heading() {
        let nav = NavigationSettings::default();
        let ally = wall(0, Vec2::new(20.0, -30.0), 10.0);
        let obstacles = [ally];

        let result = calculate_movement(&input(&[], &obstacles), &nav);

        assert!(result.should_move);
        assert!(result.direction.y > 0.0);
        assert!(result.direction.x > 0.0);
        assert!((result.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_arrival_means_no_motion() {
        let nav = NavigationSettings::default();
        let mut at_goal = input(&[], &[]);
        at_goal.goal = Vec2::ZERO;
        let result = calculate_movement(&at_goal, &nav);
        assert!(!result.should_move);
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let nav = NavigationSettings::default();
        let mut edge = input(&[], &[]);
        edge.position = Vec2::new(995.0, 0.0);
        edge.goal = Vec2::new(1500.0, 0.0);
        let result = calculate_movement(&edge, &nav);
        assert_eq!(result.new_position, Vec2::new(1000.0, 0.0));
    }
}
