//! Shared test utilities for pivotal crates.
//!
//! This crate provides common test fixtures and utilities used across
//! multiple crates in the pivotal workspace.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<std::ffi::OsString>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = pivotal_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var_os(key);
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Temp directory holding a settings file path that tests can seed.
///
/// The settings file is not created until [`ConfigFixture::write`] runs.
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct ConfigFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to the settings file inside the temp directory.
    pub config_path: PathBuf,
}

impl ConfigFixture {
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_path = tempdir.path().join(".pivotal_tracker_cli.json");
        Ok(Self {
            tempdir,
            config_path,
        })
    }

    /// Creates a fixture whose settings file already holds `contents`.
    pub fn with_contents(contents: &str) -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write(contents)?;
        Ok(fixture)
    }

    pub fn write(&self, contents: &str) -> std::io::Result<()> {
        std::fs::write(&self.config_path, contents)
    }

    /// Current file contents, or `None` when the file does not exist.
    pub fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.config_path).ok()
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Backdates the settings file's modification time by an hour so a
    /// rewrite is visible even on coarse-grained filesystems.
    pub fn backdate(&self) -> std::io::Result<std::time::SystemTime> {
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        let file = std::fs::File::options()
            .write(true)
            .open(&self.config_path)?;
        file.set_modified(past)?;
        std::fs::metadata(&self.config_path)?.modified()
    }

    pub fn modified(&self) -> std::io::Result<std::time::SystemTime> {
        std::fs::metadata(&self.config_path)?.modified()
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }
}

/// Writes a `#!/bin/sh` script named `name` into `dir` with the given mode.
///
/// Returns the path to the script.
#[cfg(unix)]
pub fn write_script(
    dir: &Path,
    name: &str,
    body: &str,
    mode: u32,
) -> std::io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))?;
    Ok(path)
}
