//! Lazily loaded settings store mirroring a flat JSON file.
//!
//! The in-memory state is an immutable snapshot behind an [`Arc`]. Every
//! mutation builds a new snapshot and swaps it in with a single assignment,
//! so a snapshot handed out earlier never changes underneath its holder.
//!
//! Reads lazily load the file from the configured path the first time they
//! run. Only [`ConfigStore::snapshot`], which takes `&self`, can observe an
//! unloaded store and reports [`ConfigError::NotLoaded`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::env::default_config_path;
use crate::error::{ConfigError, LoadError, Result};
use crate::setting::Setting;

/// Contents of the settings file: setting name to JSON value.
pub type ConfigState = Map<String, Value>;

#[derive(Debug)]
pub struct ConfigStore {
    default_path: PathBuf,
    path: PathBuf,
    snapshot: Option<Arc<ConfigState>>,
    dirty: bool,
    empty: bool,
}

impl ConfigStore {
    /// Creates an unloaded store whose default file is `default_path`.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        let default_path = default_path.into();
        Self {
            path: default_path.clone(),
            default_path,
            snapshot: None,
            dirty: false,
            empty: false,
        }
    }

    /// Creates an unloaded store for the resolved default settings path.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    /// Path the next lazy load and every save use.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Loads the default settings file. See [`ConfigStore::load_from`].
    pub fn load(&mut self) -> Result<bool> {
        let path = self.default_path.clone();
        self.load_from(path)
    }

    /// Discards all in-memory state, including unsaved changes, and reads
    /// `path`, which becomes the target of later saves.
    ///
    /// A missing (or zero-length) file yields an empty snapshot and marks the store
    /// empty. On error the store is left unloaded. Returns whether the loaded
    /// snapshot holds any keys.
    pub fn load_from(&mut self, path: impl Into<PathBuf>) -> Result<bool> {
        self.snapshot = None;
        self.dirty = false;
        self.empty = false;
        self.path = path.into();

        let state = match read_state(&self.path) {
            Ok(Some(state)) => state,
            Ok(None) => ConfigState::new(),
            Err(source) => {
                return Err(ConfigError::Load {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        self.empty = state.is_empty();
        tracing::debug!(
            target: "pivotal::config",
            path = %self.path.display(),
            keys = state.len(),
            "Loaded configuration file"
        );
        self.snapshot = Some(Arc::new(state));
        Ok(!self.empty)
    }

    fn ensure_loaded(&mut self) -> Result<&Arc<ConfigState>> {
        if self.snapshot.is_none() {
            let path = self.path.clone();
            self.load_from(path)?;
        }
        self.snapshot.as_ref().ok_or(ConfigError::NotLoaded)
    }

    /// Current snapshot, shared read-only. Never loads.
    pub fn snapshot(&self) -> Result<Arc<ConfigState>> {
        self.snapshot.clone().ok_or(ConfigError::NotLoaded)
    }

    /// Returns a copy of the value stored for `setting`, if any.
    pub fn get(&mut self, setting: Setting) -> Result<Option<Value>> {
        Ok(self.ensure_loaded()?.get(setting.as_str()).cloned())
    }

    /// Replaces the snapshot with one where `setting` maps to `value`.
    pub fn set(&mut self, setting: Setting, value: impl Into<Value>) -> Result<()> {
        let mut next = ConfigState::clone(self.ensure_loaded()?);
        next.insert(setting.as_str().to_string(), value.into());
        self.snapshot = Some(Arc::new(next));
        self.dirty = true;
        self.empty = false;
        Ok(())
    }

    /// Removes `setting`, returning its previous value. Removing an absent
    /// setting leaves the store clean.
    pub fn unset(&mut self, setting: Setting) -> Result<Option<Value>> {
        let current = self.ensure_loaded()?;
        if !current.contains_key(setting.as_str()) {
            return Ok(None);
        }
        let mut next = ConfigState::clone(current);
        let previous = next.shift_remove(setting.as_str());
        self.snapshot = Some(Arc::new(next));
        self.dirty = true;
        Ok(previous)
    }

    /// Whether the snapshot has changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the settings file was absent or held no keys at load time,
    /// and nothing has been set since.
    pub fn is_empty(&mut self) -> Result<bool> {
        self.ensure_loaded()?;
        Ok(self.empty)
    }

    pub fn token(&mut self) -> Result<Option<String>> {
        Ok(self
            .get(Setting::Token)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> Result<()> {
        self.set(Setting::Token, token.into())
    }

    /// Current project id. Accepts numbers and numeric strings.
    pub fn current_project(&mut self) -> Result<Option<u64>> {
        Ok(match self.get(Setting::CurrentProject)? {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn set_current_project(&mut self, project: u64) -> Result<()> {
        self.set(Setting::CurrentProject, project)
    }

    pub fn api_url(&mut self) -> Result<Option<String>> {
        Ok(self
            .get(Setting::ApiUrl)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn set_api_url(&mut self, url: impl Into<String>) -> Result<()> {
        self.set(Setting::ApiUrl, url.into())
    }

    /// Writes the snapshot back to [`ConfigStore::path`] if it is dirty.
    ///
    /// The file is replaced atomically. A store that found no file and is
    /// still empty never creates one. On failure the store stays dirty so
    /// the caller can retry.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!(target: "pivotal::config", "Configuration unchanged, skipping save");
            return Ok(());
        }
        let Some(state) = self.snapshot.clone() else {
            return Ok(());
        };
        if self.empty && !self.path.exists() {
            return Ok(());
        }

        write_atomic(&self.path, &state).map_err(|source| ConfigError::Save {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;

        tracing::debug!(
            target: "pivotal::config",
            path = %self.path.display(),
            keys = state.len(),
            "Saved configuration file"
        );
        Ok(())
    }
}

fn read_state(path: &Path) -> Result<Option<ConfigState>, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if text.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(Some(map)),
        other => Err(LoadError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn write_atomic(path: &Path, state: &ConfigState) -> io::Result<()> {
    let data = serde_json::to_string(state).map_err(io::Error::other)?;

    // A symlinked settings file is rewritten at its target; the link stays.
    let resolved = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let path = resolved.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Temp file in the target directory so the final rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(meta) => copy_metadata(tmp.as_file(), &meta)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn copy_metadata(file: &fs::File, meta: &fs::Metadata) -> io::Result<()> {
    file.set_permissions(meta.permissions())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::{fchown, MetadataExt};

        // Only root may hand a file to another owner.
        if let Err(e) = fchown(file, Some(meta.uid()), Some(meta.gid())) {
            tracing::trace!(
                target: "pivotal::config",
                error = %e,
                "Could not preserve config file ownership"
            );
        }
    }
    Ok(())
}
