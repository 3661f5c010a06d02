//! PATH-based executable lookup with fallback locations.

use std::path::PathBuf;

/// System fallback paths to check if executable not found in PATH.
const FALLBACK_PATHS: &[&str] = &["/usr/local/bin", "/usr/bin"];

/// Find an executable by name.
///
/// The system PATH is searched first via the `which` crate, which also
/// resolves `.cmd`/`.ps1` shims through `PATHEXT` on Windows. Names that
/// already contain a path separator are returned as-is when they exist.
///
/// Fallbacks cover tools installed earlier in the same run whose directory is
/// not yet on this process's PATH: Scoop's shims directory on Windows, and the
/// usual system and user bin directories elsewhere.
pub(crate) fn find_executable(name: &str) -> Option<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    if cfg!(windows) {
        let shims = std::env::var_os("SCOOP")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join("scoop")))?
            .join("shims");
        return which::which_in(name, Some(shims), std::env::current_dir().ok()?).ok();
    }

    for dir in FALLBACK_PATHS {
        let path = PathBuf::from(dir).join(name);
        if path.is_file() {
            return Some(path);
        }
    }

    let home = dirs::home_dir()?;
    [home.join(".local/bin").join(name), home.join("bin").join(name)]
        .into_iter()
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_find_common_executable() {
        let path = find_executable("sh").expect("sh should exist on any Unix system");
        assert!(path.exists());
    }

    #[test]
    fn test_find_nonexistent_executable() {
        assert!(find_executable("definitely_not_a_real_executable_12345").is_none());
    }
}
