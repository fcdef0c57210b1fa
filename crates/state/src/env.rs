use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// File name of the settings file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".pivotal_tracker_cli.json";

/// Environment variable that overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "PIVOTAL_CONFIG";

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)
}

/// Returns the settings path from `PIVOTAL_CONFIG`, if set and non-empty.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Resolves the default settings path.
///
/// `PIVOTAL_CONFIG` wins; otherwise `~/.pivotal_tracker_cli.json`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(custom) = config_path_from_env() {
        return Ok(custom);
    }
    Ok(home_dir()?.join(CONFIG_FILE_NAME))
}
