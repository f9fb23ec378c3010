//! Error types for the config crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading rule files and biome tables
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The `[settings]` table has a field of the wrong type
    #[error("invalid [settings] table: {0}")]
    Settings(#[source] toml::de::Error),

    /// A biome table entry could not be used
    #[error("invalid biome entry {id:?}: {reason}")]
    Biome { id: String, reason: String },

    /// The file watcher could not be set up
    #[error("file watcher error: {0}")]
    Watch(#[from] notify_debouncer_mini::notify::Error),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
