pub mod range_types;

use crate::game_logic::errors::{SiegeError, SiegeResult};
use crate::resources::GameConfig;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("siegeline");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults when it is missing or broken
pub fn load_config() -> GameConfig {
    let Some(config_path) = get_config_path() else {
        warn!("No config directory available, using default settings");
        return GameConfig::default();
    };

    if !config_path.exists() {
        return GameConfig::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(err) => {
            warn!("Ignoring config at {}: {}", config_path.display(), err);
            GameConfig::default()
        }
    }
}

/// Strict load: parse errors and invalid profiles are reported, not masked
pub fn load_config_from(path: &Path) -> SiegeResult<GameConfig> {
    if !path.exists() {
        return Err(SiegeError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let config = toml::from_str::<GameConfig>(&contents)?;
    config.settings.validate_profiles()?;
    info!(
        "Loaded {} hostile profiles from {}",
        config.settings.profiles.len(),
        path.display()
    );
    Ok(config)
}

pub fn save_config(config: &GameConfig) -> SiegeResult<()> {
    let config_path = get_config_path().ok_or(SiegeError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &GameConfig, path: &Path) -> SiegeResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
