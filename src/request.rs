//! The immutable input to an installation run.

use crate::Platform;
use std::io;
use std::path::{Path, PathBuf};

/// Where to install and who asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRequest {
    /// Absolute directory the project is installed into.
    pub target_path: PathBuf,

    /// Path of the installer binary itself.
    ///
    /// Legacy field kept for callers that still pass it; the run never reads it.
    pub installer_path: Option<PathBuf>,
}

impl InstallationRequest {
    /// Create a request for an explicit target directory.
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
            installer_path: None,
        }
    }

    /// Create a request for the project folder inside `parent`.
    ///
    /// The folder name follows the platform convention (`.cosmo` outside
    /// Windows) and the resulting path is made absolute against the current
    /// directory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::{InstallationRequest, Platform};
    /// use std::path::Path;
    ///
    /// let request = InstallationRequest::in_parent(Path::new("/home/u"), Platform::Linux, "cosmo").unwrap();
    /// assert_eq!(request.target_path, Path::new("/home/u/.cosmo"));
    /// ```
    pub fn in_parent(parent: &Path, platform: Platform, project_name: &str) -> io::Result<Self> {
        let target = parent.join(platform.project_dir_name(project_name));
        Ok(Self::new(std::path::absolute(target)?))
    }

    /// Attach the legacy installer path.
    pub fn with_installer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.installer_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_parent_linux_hidden() {
        let request =
            InstallationRequest::in_parent(Path::new("/home/u"), Platform::Linux, "cosmo").unwrap();
        assert_eq!(request.target_path, PathBuf::from("/home/u/.cosmo"));
        assert!(request.installer_path.is_none());
    }

    #[test]
    fn test_in_parent_windows_plain() {
        let request =
            InstallationRequest::in_parent(Path::new("/opt"), Platform::Windows, "cosmo").unwrap();
        assert!(request.target_path.ends_with("cosmo"));
        assert!(!request.target_path.ends_with(".cosmo"));
    }

    #[test]
    fn test_in_parent_relative_becomes_absolute() {
        let request =
            InstallationRequest::in_parent(Path::new("some/dir"), Platform::Linux, "cosmo").unwrap();
        assert!(request.target_path.is_absolute());
        assert!(request.target_path.ends_with("some/dir/.cosmo"));
    }

    #[test]
    fn test_with_installer_path() {
        let request = InstallationRequest::new("/tmp/x").with_installer_path("/usr/bin/installer");
        assert_eq!(
            request.installer_path,
            Some(PathBuf::from("/usr/bin/installer"))
        );
    }
}
