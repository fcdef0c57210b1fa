use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for settings store operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Errors surfaced by [`crate::ConfigStore`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be turned into a snapshot.
    #[error("unable to load config file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// Writing or replacing the settings file failed. The store stays dirty.
    #[error("unable to save config file {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A snapshot was requested before the store was ever loaded.
    #[error("configuration not loaded")]
    NotLoaded,

    /// No home directory to derive the default settings path from.
    #[error("home directory not found")]
    HomeDirNotFound,
}

/// Underlying cause of a [`ConfigError::Load`].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON whose top level is not an object.
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
}
