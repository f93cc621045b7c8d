use derive_more::Display;
use serde::{Deserialize, Serialize};

// Every scalar below is clamped on construction and on deserialization, so a
// hand-edited config.toml can never feed out-of-range values into the core.

/// A movement speed in world units per second, constrained to [1.0, 1000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct MoveSpeed(f32);

impl MoveSpeed {
    const MIN: f32 = 1.0;
    const MAX: f32 = 1000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for MoveSpeed {
    fn default() -> Self {
        Self::new(60.0)
    }
}

/// A maximum health value constrained to [1.0, 100000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct HealthValue(f32);

impl HealthValue {
    const MIN: f32 = 1.0;
    const MAX: f32 = 100_000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for HealthValue {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Stagger resistance as a fraction of max health, constrained to [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Tenacity(f32);

impl Tenacity {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        // NaN collapses to "no resistance"
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Tenacity {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A multiplicative buff strength, constrained to [0.0, 5.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct BuffEffect(f32);

impl BuffEffect {
    const MIN: f32 = 0.0;
    const MAX: f32 = 5.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Factor applied to speed and damage (and divided out of attack interval)
    pub fn factor(self) -> f32 {
        1.0 + self.0
    }
}

impl Default for BuffEffect {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// A scan radius constrained to [10.0, 2000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct DetectionRadius(f32);

impl DetectionRadius {
    const MIN: f32 = 10.0;
    const MAX: f32 = 2000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for DetectionRadius {
    fn default() -> Self {
        Self::new(200.0)
    }
}

/// An attack reach constrained to [1.0, 1000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct AttackRange(f32);

impl AttackRange {
    const MIN: f32 = 1.0;
    const MAX: f32 = 1000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for AttackRange {
    fn default() -> Self {
        Self::new(40.0)
    }
}

/// A body radius for circle collision, constrained to [1.0, 200.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct CollisionRadius(f32);

impl CollisionRadius {
    const MIN: f32 = 1.0;
    const MAX: f32 = 200.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for CollisionRadius {
    fn default() -> Self {
        Self::new(16.0)
    }
}

/// A duration or cooldown in seconds, constrained to [0.05, 600.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Seconds(f32);

impl Seconds {
    const MIN: f32 = 0.05;
    const MAX: f32 = 600.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::new(1.0)
    }
}

macro_rules! f32_conversions {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<f32> for $ty {
                fn from(value: f32) -> Self {
                    Self::new(value)
                }
            }

            impl From<$ty> for f32 {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }
        )*
    };
}

f32_conversions!(
    MoveSpeed,
    HealthValue,
    Tenacity,
    BuffEffect,
    DetectionRadius,
    AttackRange,
    CollisionRadius,
    Seconds,
);
