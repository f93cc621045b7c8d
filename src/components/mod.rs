use bevy::prelude::*;
use derive_more::{Add, Display, From, Mul};

// Generic bounded pool; hostiles only carry health today
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ResourcePool<T> {
    pub current: f32,
    pub max: f32,
    _marker: std::marker::PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Health;

pub type HealthPool = ResourcePool<Health>;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Add, Mul, Display, From)]
pub struct Damage(pub f32);

impl<T> ResourcePool<T> {
    pub fn new(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.max(0.0).min(max),
            max,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn new_full(max: f32) -> Self {
        Self::new(max, max)
    }

    pub fn is_full(self) -> bool {
        self.current >= self.max
    }

    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Refill to a (possibly new) maximum
    pub fn reset_to(&mut self, max: f32) {
        *self = Self::new_full(max);
    }
}

impl ResourcePool<Health> {
    pub fn is_dead(self) -> bool {
        self.current <= 0.0
    }

    pub fn take_damage(&mut self, damage: Damage) {
        self.drain(damage.0);
    }
}

impl<T> std::fmt::Display for ResourcePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}/{:.0}", self.current, self.max)
    }
}

impl Damage {
    pub fn new(value: f32) -> Self {
        Self(value.max(0.0))
    }
}

/// Sprite orientation, derived from the last committed horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Negative x flips to the left; a zero x keeps the current facing
    pub fn from_direction(current: Facing, direction: Vec2) -> Facing {
        if direction.x < 0.0 {
            Facing::Left
        } else if direction.x > 0.0 {
            Facing::Right
        } else {
            current
        }
    }
}
