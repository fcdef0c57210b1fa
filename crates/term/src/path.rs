use std::fs;
use std::path::{Path, PathBuf};

/// Returns the first `PATH` entry holding an executable regular file named `name`.
///
/// Empty `PATH` entries are skipped rather than treated as the current directory.
pub fn find_command(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Checks whether `name` resolves to an executable on `PATH`.
pub fn command_exists(name: &str) -> bool {
    find_command(name).is_some()
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
