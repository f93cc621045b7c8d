use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiegeError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid actor profile {reason}")]
    InvalidProfile { reason: String },

    // Simulation errors
    #[error("Unknown hostile type: {type_key}")]
    UnknownHostileType { type_key: String },

    #[error("No hostile is registered under {handle}")]
    StaleHandle { handle: String },
}

/// Result type alias for all fallible operations
pub type SiegeResult<T> = Result<T, SiegeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siege_error_display() {
        let err = SiegeError::UnknownHostileType {
            type_key: "wyvern".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown hostile type: wyvern");

        let err = SiegeError::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Failed to get config directory");
    }

    #[test]
    fn test_io_error_converts() {
        fn read_missing() -> SiegeResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }
        assert!(matches!(read_missing(), Err(SiegeError::Io(_))));
    }
}
