//! Host platform enum driving every platform-specific decision.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// The operating system family the installer runs on.
///
/// The platform is resolved once at startup with [`Platform::current`] and
/// then passed explicitly, so the orchestrator logic stays identical across
/// platforms and tests can exercise any branch from any host.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::Platform;
///
/// for platform in Platform::all() {
///     println!("{}: elevation required = {}", platform.display_name(), platform.requires_elevation());
/// }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Platform {
    /// Microsoft Windows (toolchain provisioned through Scoop)
    Windows,
    /// Linux with APT (toolchain provisioned through apt-get)
    Linux,
    /// macOS (no automatic provisioning)
    MacOs,
    /// Any other platform (no automatic provisioning)
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    /// Human-readable platform name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::Platform;
    ///
    /// assert_eq!(Platform::MacOs.display_name(), "macOS");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Other => "this platform",
        }
    }

    /// Whether a run must be started with administrator privileges.
    ///
    /// Only Windows installs into a system location by default.
    pub fn requires_elevation(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Name of the project folder created under the chosen parent directory.
    ///
    /// Non-Windows platforms follow the hidden-dotfile convention.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::Platform;
    ///
    /// assert_eq!(Platform::Linux.project_dir_name("cosmo"), ".cosmo");
    /// assert_eq!(Platform::Windows.project_dir_name("cosmo"), "cosmo");
    /// ```
    pub fn project_dir_name(&self, name: &str) -> String {
        match self {
            Self::Windows => name.to_string(),
            _ => format!(".{}", name),
        }
    }

    /// Parent directory offered when the user does not choose one.
    pub fn default_parent_dir(&self) -> Option<PathBuf> {
        match self {
            Self::Windows => Some(PathBuf::from(r"C:\Program Files")),
            Self::MacOs => Some(PathBuf::from("/Applications")),
            Self::Linux | Self::Other => dirs::home_dir(),
        }
    }

    /// Iterator over all known platforms.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}
