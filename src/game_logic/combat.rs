use crate::components::{Damage, Facing};
use crate::game_logic::abilities::{AbilityKind, CasterInfo};
use crate::game_logic::actor::{Activity, Cast, Corpse, HostileActor, Recoil, Resume, Swing};
use crate::game_logic::movement::{PathPlan, SteeringInput, calculate_movement};
use crate::game_logic::targeting::{
    approach_distance, is_valid, live_walls, revalidate, select_target,
};
use crate::game_logic::world::{
    AnimationClip, TargetCategory, TargetRef, TargetSnapshot, TickContext, WorldQuery,
};
use crate::resources::GamePhase;
use bevy::prelude::*;

/// What the owner should do with the actor after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Active,
    /// Play is not running; nothing moved
    Frozen,
    Dying,
    /// Corpse time is up; hand the actor back to its pool
    ReadyForRelease,
    /// Sitting in a pool
    Dormant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Ignored,
    Absorbed,
    Staggered,
    Killed,
}

// Side effects of attacks and casts land halfway through the animation
const IMPACT_POINT: f32 = 0.5;

impl HostileActor {
    /// Apply incoming damage. Dying and pooled actors ignore it.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || !amount.is_finite() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }

        self.health.take_damage(Damage::new(amount));
        let now = self.clock;

        if self.health.is_dead() {
            self.begin_dying();
            return DamageOutcome::Killed;
        }

        if matches!(self.activity, Activity::Casting(_)) && self.profile.uninterruptible_casts {
            self.stagger.accumulate(amount, now);
            return DamageOutcome::Absorbed;
        }

        if self.stagger.on_damage(amount, self.stats.max_health, now) {
            self.begin_recoil();
            return DamageOutcome::Staggered;
        }

        DamageOutcome::Absorbed
    }

    /// Advance one frame. Dying progresses regardless of play state; every
    /// other state is frozen unless the game is Playing.
    pub fn update(&mut self, dt: f32, ctx: &mut TickContext) -> TickOutcome {
        let dt = dt.max(0.0);
        match self.activity {
            Activity::Pooled => return TickOutcome::Dormant,
            Activity::Dying(corpse) => return self.advance_corpse(corpse, dt, ctx),
            _ => {}
        }

        if ctx.game_state.phase() != GamePhase::Playing {
            return TickOutcome::Frozen;
        }

        if let Some((clip, duration)) = self.pending_clip.take() {
            ctx.sinks.animation.play(self.handle, clip, duration);
        }

        self.clock += dt;
        let now = self.clock;
        for slot in &mut self.abilities {
            slot.ability.maintain(now, ctx.world);
        }
        self.tick_attachments(dt);
        self.refresh_crystal(&*ctx.world);
        self.refresh_target(ctx);

        match self.activity {
            Activity::Attacking(swing) => self.advance_swing(swing, dt, ctx),
            Activity::Casting(cast) => self.advance_cast(cast, dt, ctx),
            Activity::Staggered(recoil) => self.advance_recoil(recoil, dt, ctx),
            Activity::Idle | Activity::Walking => self.decide(dt, ctx),
            Activity::Dying(_) | Activity::Pooled => {}
        }

        TickOutcome::Active
    }

    fn begin_dying(&mut self) {
        self.activity = Activity::Dying(Corpse {
            elapsed: 0.0,
            settled: false,
        });
        self.current_target = None;
        self.pending_clip = None;
    }

    fn begin_recoil(&mut self) {
        let resume = match self.activity {
            Activity::Walking => Resume::Walking,
            Activity::Staggered(previous) => previous.resume,
            _ => Resume::Idle,
        };
        let duration = self.stats.stagger_duration;
        self.activity = Activity::Staggered(Recoil {
            elapsed: 0.0,
            duration,
            resume,
        });
        self.pending_clip = Some((AnimationClip::Stagger, duration));
    }

    fn advance_corpse(&mut self, mut corpse: Corpse, dt: f32, ctx: &mut TickContext) -> TickOutcome {
        if !corpse.settled {
            self.settle_death(ctx);
            corpse.settled = true;
        }
        corpse.elapsed += dt;
        self.activity = Activity::Dying(corpse);

        if corpse.elapsed >= ctx.settings.corpse_linger.get() {
            TickOutcome::ReadyForRelease
        } else {
            TickOutcome::Dying
        }
    }

    /// One-shot death bookkeeping: rewards, death presentation, and undoing
    /// anything this actor's abilities still hold on others
    fn settle_death(&mut self, ctx: &mut TickContext) {
        ctx.sinks.rewards.add_gold(self.profile.gold);
        ctx.sinks.rewards.add_experience(self.profile.experience);
        ctx.sinks.audio.play_sfx(&format!("{}/death", self.type_key));
        ctx.sinks
            .animation
            .play(self.handle, AnimationClip::Death, self.stats.death_animation);

        for slot in &mut self.abilities {
            slot.ability.on_caster_death(ctx.world);
        }

        info!(
            "{} fell at ({:.0}, {:.0}): +{} gold, +{} xp",
            self.type_key, self.position.x, self.position.y, self.profile.gold, self.profile.experience
        );
    }

    pub(crate) fn refresh_crystal(&mut self, world: &dyn WorldQuery) {
        if self.crystal.is_some_and(|handle| world.resolve(handle).is_some()) {
            return;
        }
        self.crystal = world
            .find_by_category(TargetCategory::Crystal)
            .into_iter()
            .find(|crystal| crystal.alive)
            .map(|crystal| crystal.handle);
    }

    fn refresh_target(&mut self, ctx: &mut TickContext) {
        let kept = revalidate(&*ctx.world, self.current_target);
        if let (Some(lost), None) = (self.current_target, kept) {
            debug!("{} lost target {}", self.type_key, lost);
        }
        self.current_target = kept;
        self.navigation.blocked_by = revalidate(&*ctx.world, self.navigation.blocked_by);

        // An engagement in progress is never swapped out mid-swing
        if matches!(self.activity, Activity::Attacking(_)) {
            return;
        }

        let selection = select_target(self, &*ctx.world, &ctx.settings.navigation);
        let next = selection.map(|selection| selection.target);
        if next != self.current_target {
            if let Some(selection) = selection {
                debug!(
                    "{} targets {} ({:?})",
                    self.type_key, selection.target, selection.reason
                );
            }
        }
        self.current_target = next;
    }

    fn tick_cooldowns(&mut self, dt: f32) {
        self.attack_timer += dt;
        for slot in &mut self.abilities {
            slot.timer += dt;
        }
    }

    fn ready_ability(&self, kind: AbilityKind) -> Option<usize> {
        self.abilities
            .iter()
            .position(|slot| slot.ability.kind() == kind && slot.is_ready())
    }

    fn decide(&mut self, dt: f32, ctx: &mut TickContext) {
        self.tick_cooldowns(dt);

        let target = self
            .current_target
            .and_then(|handle| ctx.world.resolve(handle))
            .filter(|target| target.alive);
        let engaged = target.filter(|target| self.in_attack_range(target));
        let attack_ready = self.attack_timer >= self.stats.buffable.attack_interval;

        let ready = self
            .ready_ability(AbilityKind::Buff)
            .or_else(|| self.ready_ability(AbilityKind::Special));
        if let Some(slot) = ready {
            let resume = engaged.filter(|_| attack_ready).map(|target| target.handle);
            self.begin_cast(slot, resume, ctx);
            return;
        }

        if let Some(target) = engaged {
            self.facing = Facing::from_direction(self.facing, target.position - self.position);
            if attack_ready {
                self.begin_swing(target.handle, ctx);
            } else {
                self.set_activity(Activity::Idle, ctx);
            }
            return;
        }

        match target {
            Some(target) => self.walk_toward(&target, dt, ctx),
            None => self.set_activity(Activity::Idle, ctx),
        }
    }

    fn begin_swing(&mut self, target: TargetRef, ctx: &mut TickContext) {
        self.attack_timer = 0.0;
        self.set_activity(
            Activity::Attacking(Swing {
                target,
                elapsed: 0.0,
                duration: self.stats.attack_animation,
                struck: false,
            }),
            ctx,
        );
    }

    fn begin_cast(&mut self, index: usize, resume: Option<TargetRef>, ctx: &mut TickContext) {
        let Some(slot) = self.abilities.get_mut(index) else {
            return;
        };
        slot.timer = 0.0;
        let cast = Cast {
            slot: index,
            kind: slot.ability.kind(),
            elapsed: 0.0,
            duration: slot.ability.cast_duration(),
            released: false,
            resume,
        };
        debug!("{} begins casting {}", self.type_key, slot.ability.name());
        self.set_activity(Activity::Casting(cast), ctx);
    }

    fn advance_swing(&mut self, mut swing: Swing, dt: f32, ctx: &mut TickContext) {
        swing.elapsed += dt;

        if !swing.struck {
            if !is_valid(&*ctx.world, swing.target) {
                debug!("{} swing at {} aborted", self.type_key, swing.target);
                self.set_activity(Activity::Idle, ctx);
                return;
            }
            if swing.elapsed >= swing.duration * IMPACT_POINT {
                ctx.world
                    .damage_target(swing.target, self.stats.buffable.attack_damage);
                ctx.sinks.audio.play_sfx(&format!("{}/strike", self.type_key));
                swing.struck = true;
            }
        }

        if swing.elapsed >= swing.duration {
            self.set_activity(Activity::Idle, ctx);
        } else {
            self.activity = Activity::Attacking(swing);
        }
    }

    fn advance_cast(&mut self, mut cast: Cast, dt: f32, ctx: &mut TickContext) {
        cast.elapsed += dt;

        if !cast.released && cast.elapsed >= cast.duration * IMPACT_POINT {
            let caster = CasterInfo {
                handle: self.handle,
                position: self.position,
                now: self.clock,
            };
            if let Some(slot) = self.abilities.get_mut(cast.slot) {
                slot.ability.release(&caster, ctx.world);
                if let Some(sfx) = slot.ability.sfx() {
                    ctx.sinks.audio.play_sfx(sfx);
                }
            }
            cast.released = true;
        }

        if cast.elapsed < cast.duration {
            self.activity = Activity::Casting(cast);
            return;
        }

        let resume = cast
            .resume
            .and_then(|handle| ctx.world.resolve(handle))
            .filter(|target| target.alive && self.in_attack_range(target));
        match resume {
            Some(target) => {
                self.current_target = Some(target.handle);
                self.begin_swing(target.handle, ctx);
            }
            None => self.set_activity(Activity::Idle, ctx),
        }
    }

    fn advance_recoil(&mut self, mut recoil: Recoil, dt: f32, ctx: &mut TickContext) {
        self.tick_cooldowns(dt);
        recoil.elapsed += dt;

        if recoil.elapsed < recoil.duration {
            self.activity = Activity::Staggered(recoil);
            return;
        }

        let next = match recoil.resume {
            Resume::Walking => Activity::Walking,
            Resume::Idle => Activity::Idle,
        };
        self.set_activity(next, ctx);
    }

    fn walk_toward(&mut self, target: &TargetSnapshot, dt: f32, ctx: &mut TickContext) {
        let walls: Vec<TargetSnapshot> = live_walls(&*ctx.world)
            .into_iter()
            .filter(|wall| wall.handle != target.handle)
            .collect();
        let obstacles = self.nearby_bodies(&*ctx.world, target.handle);

        let input = SteeringInput {
            position: self.position,
            radius: self.stats.collision_radius,
            speed: self.stats.buffable.move_speed,
            delta_time: dt,
            goal: target.position,
            stop_short: approach_distance(self, target),
            walls: &walls,
            obstacles: &obstacles,
            preferred_side: self.navigation.detour_side,
            bounds: ctx.settings.arena.rect(),
        };
        let result = calculate_movement(&input, &ctx.settings.navigation);

        // Chasing a wall says nothing about whether the real goal is reachable
        let chasing_wall = target.category == TargetCategory::Wall;
        match result.plan {
            PathPlan::Detour { side, .. } => {
                self.navigation.detour_side = Some(side);
                if !chasing_wall {
                    self.navigation.blocked_by = None;
                }
            }
            PathPlan::Clear => {
                if !chasing_wall {
                    self.navigation.blocked_by = None;
                }
            }
            PathPlan::NoDetour { wall } => {
                if self.navigation.blocked_by != Some(wall) {
                    debug!("{} has no way around {}", self.type_key, wall);
                }
                self.navigation.blocked_by = Some(wall);
            }
        }

        if result.should_move {
            self.position = result.new_position;
            self.facing = Facing::from_direction(self.facing, result.direction);
            self.set_activity(Activity::Walking, ctx);
        } else {
            self.set_activity(Activity::Idle, ctx);
        }
    }

    /// Every live body worth steering around, minus ourselves and the goal
    fn nearby_bodies(&self, world: &dyn WorldQuery, goal: TargetRef) -> Vec<TargetSnapshot> {
        let own = self.handle.map(TargetRef::Hostile);
        [TargetCategory::Crystal, TargetCategory::Wall]
            .into_iter()
            .chain(TargetCategory::CHARACTERS)
            .chain(TargetCategory::BUILDINGS)
            .chain([TargetCategory::Hostile])
            .flat_map(|category| world.find_by_category(category))
            .filter(|body| body.alive && body.handle != goal && Some(body.handle) != own)
            .collect()
    }

    /// Switch state, announcing the matching clip. Discrete actions restart
    /// their clip every time; looping ones only when the state changes.
    fn set_activity(&mut self, next: Activity, ctx: &mut TickContext) {
        let before = self.state();
        self.activity = next;
        let after = self.state();

        let duration = match next {
            Activity::Attacking(swing) => Some(swing.duration),
            Activity::Staggered(recoil) => Some(recoil.duration),
            Activity::Casting(cast) => Some(cast.duration),
            Activity::Dying(_) => Some(self.stats.death_animation),
            Activity::Idle | Activity::Walking | Activity::Pooled => None,
        };

        if before == after && duration.is_none() {
            return;
        }
        if before != after {
            debug!("{} {:?} -> {:?}", self.type_key, before, after);
        }
        if let Some(clip) = after.clip() {
            ctx.sinks
                .animation
                .play(self.handle, clip, duration.unwrap_or(0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::range_types::Tenacity;
    use crate::game_logic::abilities::test_world::StubWorld;
    use crate::game_logic::abilities::{AbilitySpec, AuraConfig, ShockwaveConfig};
    use crate::game_logic::actor::{BuffableStats, CombatState};
    use crate::game_logic::world::{AnimationQueue, Sinks, SfxQueue, Treasury};
    use crate::resources::{ActorProfile, GameSettings};

    struct Rig {
        world: StubWorld,
        phase: GamePhase,
        animation: AnimationQueue,
        sfx: SfxQueue,
        treasury: Treasury,
        settings: GameSettings,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                world: StubWorld::default(),
                phase: GamePhase::Playing,
                animation: AnimationQueue::default(),
                sfx: SfxQueue::default(),
                treasury: Treasury::default(),
                settings: GameSettings::default(),
            }
        }

        fn spawn(&self, profile: ActorProfile, position: Vec2) -> HostileActor {
            HostileActor::new(&profile, &self.settings, position)
        }

        fn tick(&mut self, actor: &mut HostileActor, dt: f32) -> TickOutcome {
            let mut ctx = TickContext {
                world: &mut self.world,
                game_state: &self.phase,
                sinks: Sinks {
                    animation: &mut self.animation,
                    audio: &mut self.sfx,
                    rewards: &mut self.treasury,
                },
                settings: &self.settings,
            };
            actor.update(dt, &mut ctx)
        }

        fn tick_n(&mut self, actor: &mut HostileActor, dt: f32, count: usize) {
            for _ in 0..count {
                self.tick(actor, dt);
            }
        }
    }

    fn ally_stats() -> BuffableStats {
        BuffableStats {
            move_speed: 40.0,
            attack_damage: 10.0,
            attack_interval: 2.0,
        }
    }

    #[test]
    fn test_walks_toward_distant_crystal() {
        let mut rig = Rig::new();
        let crystal = rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(500.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);

        assert_eq!(rig.tick(&mut raider, 0.5), TickOutcome::Active);

        assert_eq!(raider.state(), CombatState::Walking);
        assert_eq!(raider.current_target(), Some(crystal));
        assert!((raider.position().x - 45.0).abs() < 1e-4);
        assert_eq!(raider.facing(), Facing::Right);
    }

    #[test]
    fn test_destroyed_wall_is_forgotten() {
        let mut rig = Rig::new();
        let wall = rig.world.add_structure(3, TargetCategory::Wall, Vec2::new(60.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        raider.current_target = Some(wall);
        raider.navigation.blocked_by = Some(wall);

        rig.world.kill(wall);
        rig.tick(&mut raider, 0.1);

        assert_eq!(raider.current_target(), None);
        assert_eq!(raider.navigation().blocked_by, None);
        assert_eq!(raider.position(), Vec2::ZERO);
    }

    #[test]
    fn test_attack_cycle_hits_at_midpoint() {
        let mut rig = Rig::new();
        // Edge sits 25 away, inside the raider's 30 reach
        let crystal = rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(45.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);

        rig.tick_n(&mut raider, 0.25, 3);
        assert_eq!(raider.state(), CombatState::Idle);

        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.state(), CombatState::Attacking);
        assert_eq!(raider.attack_timer(), 0.0);
        assert!(rig.world.damage.is_empty());

        rig.tick(&mut raider, 0.25);
        assert_eq!(rig.world.damage, vec![(crystal, 10.0)]);
        assert_eq!(raider.state(), CombatState::Attacking);
        // Cooldowns hold still during the swing
        assert_eq!(raider.attack_timer(), 0.0);

        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.state(), CombatState::Idle);
        assert_eq!(rig.world.damage.len(), 1);
        assert!(rig.sfx.played.contains(&"raider/strike".to_string()));
    }

    #[test]
    fn test_swing_aborts_when_target_vanishes() {
        let mut rig = Rig::new();
        let crystal = rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(45.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        rig.tick_n(&mut raider, 0.25, 4);
        assert_eq!(raider.state(), CombatState::Attacking);

        rig.world.kill(crystal);
        rig.tick(&mut raider, 0.25);

        assert_eq!(raider.state(), CombatState::Idle);
        assert_eq!(raider.current_target(), None);
        assert!(rig.world.damage.is_empty());
    }

    #[test]
    fn test_stagger_interrupts_swing() {
        let mut rig = Rig::new();
        rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(45.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        rig.tick_n(&mut raider, 0.25, 4);

        assert_eq!(raider.take_damage(5.0), DamageOutcome::Staggered);
        assert_eq!(raider.state(), CombatState::Staggered);

        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.state(), CombatState::Staggered);
        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.state(), CombatState::Idle);
        assert!(rig.world.damage.is_empty());
        assert!(rig
            .animation
            .requests
            .iter()
            .any(|request| request.clip == AnimationClip::Stagger));
    }

    #[test]
    fn test_stagger_returns_to_walking() {
        let mut rig = Rig::new();
        rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(500.0, 0.0));
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        rig.tick(&mut raider, 0.1);
        assert_eq!(raider.state(), CombatState::Walking);

        raider.take_damage(1.0);
        let frozen_at = raider.position();
        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.position(), frozen_at);
        rig.tick(&mut raider, 0.25);
        assert_eq!(raider.state(), CombatState::Walking);
    }

    #[test]
    fn test_stagger_respects_cooldown() {
        let mut rig = Rig::new();
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);

        assert_eq!(raider.take_damage(1.0), DamageOutcome::Staggered);
        rig.tick(&mut raider, 1.0);
        assert_eq!(raider.take_damage(1.0), DamageOutcome::Absorbed);
        rig.tick(&mut raider, 1.0);
        assert_eq!(raider.take_damage(1.0), DamageOutcome::Staggered);
    }

    #[test]
    fn test_uninterruptible_cast_absorbs_stagger() {
        let mut rig = Rig::new();
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;

        rig.tick(&mut warlord, 0.1);
        assert_eq!(warlord.state(), CombatState::Buffing);

        assert_eq!(warlord.take_damage(500.0), DamageOutcome::Absorbed);
        assert_eq!(warlord.state(), CombatState::Buffing);
        assert_eq!(warlord.health().current, 100.0);
        assert_eq!(warlord.stagger_gate().accumulated(), 500.0);
    }

    #[test]
    fn test_interruptible_cast_can_be_staggered() {
        let mut rig = Rig::new();
        let profile = ActorProfile {
            uninterruptible_casts: false,
            tenacity: Tenacity::new(0.0),
            ..ActorProfile::warlord()
        };
        let mut warlord = rig.spawn(profile, Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;
        rig.tick(&mut warlord, 0.1);

        assert_eq!(warlord.take_damage(1.0), DamageOutcome::Staggered);
        assert_eq!(warlord.state(), CombatState::Staggered);
    }

    #[test]
    fn test_aura_fires_at_cast_midpoint() {
        let mut rig = Rig::new();
        let ally = rig.world.add_hostile(7, Vec2::new(50.0, 0.0), ally_stats());
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;

        rig.tick(&mut warlord, 0.25);
        assert_eq!(warlord.state(), CombatState::Buffing);
        assert_eq!(warlord.ability_timers(), vec![0.0]);
        assert_eq!(rig.world.stats[&ally], ally_stats());

        rig.tick(&mut warlord, 0.5);
        assert!((rig.world.stats[&ally].move_speed - 52.0).abs() < 1e-4);
        assert!(rig.world.marked(ally));
        assert!(rig.sfx.played.contains(&"war_cry".to_string()));

        rig.tick(&mut warlord, 0.5);
        assert_eq!(warlord.state(), CombatState::Idle);
    }

    #[test]
    fn test_cast_resumes_interrupted_attack() {
        let mut rig = Rig::new();
        let crystal = rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(60.0, 0.0));
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;
        warlord.attack_timer = 5.0;

        rig.tick(&mut warlord, 0.5);
        assert_eq!(warlord.state(), CombatState::Buffing);
        rig.tick(&mut warlord, 0.5);
        rig.tick(&mut warlord, 0.5);

        assert_eq!(warlord.state(), CombatState::Attacking);
        assert_eq!(warlord.current_target(), Some(crystal));
    }

    #[test]
    fn test_cast_without_engagement_returns_to_idle() {
        let mut rig = Rig::new();
        rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(60.0, 0.0));
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;

        // In reach, but the attack was not ready when the cast started
        rig.tick_n(&mut warlord, 0.5, 3);
        assert_eq!(warlord.state(), CombatState::Idle);
    }

    #[test]
    fn test_buff_preferred_over_special() {
        let mut rig = Rig::new();
        let profile = ActorProfile {
            abilities: vec![
                AbilitySpec::Shockwave(ShockwaveConfig::default()),
                AbilitySpec::Aura(AuraConfig::default()),
            ],
            ..ActorProfile::warlord()
        };
        let mut boss = rig.spawn(profile, Vec2::ZERO);
        boss.abilities[0].timer = 100.0;
        boss.abilities[1].timer = 100.0;

        rig.tick(&mut boss, 0.1);
        assert_eq!(boss.state(), CombatState::Buffing);
    }

    #[test]
    fn test_special_cast_damages_defenders() {
        let mut rig = Rig::new();
        let wall = rig.world.add_structure(1, TargetCategory::Wall, Vec2::new(0.0, 100.0));
        let mut brute = rig.spawn(ActorProfile::siege_brute(), Vec2::ZERO);
        brute.abilities[0].timer = 15.0;

        rig.tick(&mut brute, 0.1);
        assert_eq!(brute.state(), CombatState::SpecialAbility);
        rig.tick(&mut brute, 0.7);
        assert_eq!(rig.world.damage, vec![(wall, 80.0)]);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut rig = Rig::new();
        rig.world.add_structure(0, TargetCategory::Crystal, Vec2::new(500.0, 0.0));
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        rig.tick(&mut warlord, 0.5);
        let position = warlord.position();
        let timers = warlord.ability_timers();
        let clock = warlord.clock();

        rig.phase = GamePhase::Paused;
        for _ in 0..100 {
            assert_eq!(rig.tick(&mut warlord, 0.5), TickOutcome::Frozen);
        }

        assert_eq!(warlord.position(), position);
        assert_eq!(warlord.ability_timers(), timers);
        assert_eq!(warlord.clock(), clock);

        rig.phase = GamePhase::Playing;
        rig.tick(&mut warlord, 0.5);
        assert!(warlord.position().x > position.x);
    }

    #[test]
    fn test_death_pays_once_then_lingers() {
        let mut rig = Rig::new();
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);

        assert_eq!(raider.take_damage(1000.0), DamageOutcome::Killed);
        assert_eq!(raider.state(), CombatState::Dying);
        assert!(!raider.is_alive());
        assert_eq!(raider.take_damage(50.0), DamageOutcome::Ignored);

        assert_eq!(rig.tick(&mut raider, 30.0), TickOutcome::Dying);
        assert_eq!(rig.treasury, Treasury { gold: 5, experience: 4 });
        assert_eq!(rig.tick(&mut raider, 30.0), TickOutcome::ReadyForRelease);
        assert_eq!(rig.treasury.gold, 5);

        let deaths = rig.sfx.played.iter().filter(|id| *id == "raider/death").count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_corpse_timer_runs_while_paused() {
        let mut rig = Rig::new();
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        raider.take_damage(1000.0);
        rig.phase = GamePhase::Paused;

        assert_eq!(rig.tick(&mut raider, 59.0), TickOutcome::Dying);
        assert_eq!(rig.tick(&mut raider, 1.0), TickOutcome::ReadyForRelease);
    }

    #[test]
    fn test_caster_death_reverts_its_buffs() {
        let mut rig = Rig::new();
        let ally = rig.world.add_hostile(7, Vec2::new(50.0, 0.0), ally_stats());
        let mut warlord = rig.spawn(ActorProfile::warlord(), Vec2::ZERO);
        warlord.abilities[0].timer = 12.0;
        rig.tick_n(&mut warlord, 0.5, 2);
        assert!(rig.world.marked(ally));

        warlord.take_damage(10_000.0);
        rig.tick(&mut warlord, 0.1);

        assert_eq!(rig.world.stats[&ally], ally_stats());
        assert!(!rig.world.marked(ally));
    }

    #[test]
    fn test_pooled_actor_is_dormant() {
        let mut rig = Rig::new();
        let mut raider = rig.spawn(ActorProfile::raider(), Vec2::ZERO);
        raider.activity = Activity::Pooled;

        assert_eq!(rig.tick(&mut raider, 1.0), TickOutcome::Dormant);
        assert_eq!(raider.take_damage(10.0), DamageOutcome::Ignored);
        assert!(!raider.is_alive());
    }
}
