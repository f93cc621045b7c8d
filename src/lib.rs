pub mod components;
pub mod config;
pub mod game_logic;
pub mod plugins;
pub mod resources;

// Plugins - main.rs wires the headless app from these
pub use plugins::*;

// Errors - the simulator binary reports through these
pub use game_logic::errors::{SiegeError, SiegeResult};
