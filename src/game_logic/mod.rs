pub mod abilities;
pub mod actor;
pub mod battlefield;
pub mod combat;
pub mod errors;
pub mod lifecycle;
pub mod movement;
pub mod scenario;
pub mod stagger;
pub mod targeting;
pub mod world;

pub use actor::{BuffableStats, CombatState, HostileActor};
pub use battlefield::{Battlefield, Structure, TickSummary};
pub use combat::{DamageOutcome, TickOutcome};
pub use lifecycle::{ActorPool, ObjectPool, PoolStats, retire_hostile, spawn_hostile};
pub use world::*;
