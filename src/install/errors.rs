//! Error types for installation runs.
//!
//! Every fatal condition of a run maps to one [`InstallError`] variant. Each
//! variant carries a `fix` field with an actionable suggestion that the
//! presentation layer shows next to the message.

use crate::command::CommandError;
use crate::Platform;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that halt an installation run.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::InstallError;
///
/// fn handle_error(error: InstallError) {
///     eprintln!("Installation failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// The run needs administrator privileges and does not have them.
    ///
    /// Checked before anything on disk is touched.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Description of what permission was missing.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Creating, reading or entering the target directory failed.
    #[error("{message}: {source}")]
    Filesystem {
        /// What the installer was trying to do.
        message: String,
        /// Directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// An external command could not be started or exited unsuccessfully.
    #[error("{message}")]
    CommandFailed {
        /// Description of the failure.
        message: String,
        /// Command line that failed.
        command: String,
        /// Exit code, if the process ran.
        exit_code: Option<i32>,
        /// Standard error of the process, if it ran.
        stderr: Option<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A package manager needed to install the toolchain is absent.
    #[error("Missing dependency: {name}")]
    DependencyMissing {
        /// Name of the missing tool (e.g., "Scoop").
        name: String,
        /// URL where the tool can be obtained.
        install_url: Option<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Software known to break the toolchain install is present.
    ///
    /// Detection is a best-effort heuristic, not an exhaustive check.
    #[error("Conflicting installation: {name}")]
    ConflictingInstallation {
        /// Name of the conflicting software.
        name: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The toolchain cannot be provisioned automatically on this platform.
    #[error("Automatic toolchain installation is not supported on {}", .platform.display_name())]
    UnsupportedPlatform {
        /// The host platform.
        platform: Platform,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Another run is already in progress on this installer.
    #[error("An installation is already in progress")]
    AlreadyRunning {
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl InstallError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::InstallError;
    ///
    /// let error = InstallError::AlreadyRunning {
    ///     fix: "Wait for the current installation to finish".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("Wait"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::PermissionDenied { fix, .. } => fix,
            Self::Filesystem { fix, .. } => fix,
            Self::CommandFailed { fix, .. } => fix,
            Self::DependencyMissing { fix, .. } => fix,
            Self::ConflictingInstallation { fix, .. } => fix,
            Self::UnsupportedPlatform { fix, .. } => fix,
            Self::AlreadyRunning { fix, .. } => fix,
        }
    }

    pub(crate) fn filesystem(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        let fix = if source.kind() == std::io::ErrorKind::PermissionDenied {
            "Run the installer as an administrator or choose a directory you own".to_string()
        } else {
            "Check that the installation path is valid and writable".to_string()
        };
        Self::Filesystem {
            message: message.into(),
            path: path.into(),
            source,
            fix,
        }
    }
}

impl From<CommandError> for InstallError {
    fn from(error: CommandError) -> Self {
        let fix = match &error {
            CommandError::NotFound { program, .. } => {
                format!("Install '{}' and make sure it is on your PATH", program)
            }
            CommandError::Timeout { .. } => {
                "Increase command_timeout_secs in the config or check your network".to_string()
            }
            _ => "See the command output for details, then re-run the installer".to_string(),
        };
        Self::CommandFailed {
            message: error.to_string(),
            command: error.command().to_string(),
            exit_code: error.exit_code(),
            stderr: error.stderr().map(str::to_string),
            fix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandSpec;

    #[test]
    fn test_permission_denied_display() {
        let error = InstallError::PermissionDenied {
            message: "You are not running with elevated privileges".to_string(),
            fix: "Restart the app as an administrator".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Permission denied: You are not running with elevated privileges"
        );
    }

    #[test]
    fn test_filesystem_fix_depends_on_kind() {
        let denied = InstallError::filesystem(
            "Failed to create directory",
            "/opt/cosmo",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(denied.fix_suggestion().contains("administrator"));
        assert!(denied.to_string().starts_with("Failed to create directory: "));

        let other = InstallError::filesystem(
            "Failed to create directory",
            "/opt/cosmo",
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        );
        assert!(other.fix_suggestion().contains("writable"));
    }

    #[test]
    fn test_from_command_error_non_zero() {
        let spec = CommandSpec::new("shards").args(["build"]);
        let error: InstallError = CommandError::non_zero_exit(
            &spec,
            1,
            "compile error\n".to_string(),
            Some("Failed to build Cosmo"),
        )
        .into();

        match error {
            InstallError::CommandFailed {
                message,
                command,
                exit_code,
                stderr,
                ..
            } => {
                assert_eq!(message, "Failed to build Cosmo");
                assert_eq!(command, "shards build");
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr.as_deref(), Some("compile error\n"));
            }
            other => panic!("Unexpected error type: {:?}", other),
        }
    }

    #[test]
    fn test_from_command_error_not_found() {
        let error: InstallError = CommandError::not_found("git", None).into();
        assert!(error.fix_suggestion().contains("'git'"));
        assert!(matches!(
            error,
            InstallError::CommandFailed {
                exit_code: None,
                stderr: None,
                ..
            }
        ));
    }

    #[test]
    fn test_all_variants_have_fix() {
        let errors = vec![
            InstallError::PermissionDenied {
                message: "not elevated".to_string(),
                fix: "Restart as administrator".to_string(),
            },
            InstallError::filesystem(
                "Failed to read the directory",
                "/tmp",
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ),
            CommandError::not_found("crystal", None).into(),
            InstallError::DependencyMissing {
                name: "Scoop".to_string(),
                install_url: Some("https://scoop.sh".to_string()),
                fix: "Install Scoop".to_string(),
            },
            InstallError::ConflictingInstallation {
                name: "Visual Studio".to_string(),
                fix: "Uninstall Visual Studio".to_string(),
            },
            InstallError::UnsupportedPlatform {
                platform: Platform::MacOs,
                fix: "Install Crystal manually".to_string(),
            },
            InstallError::AlreadyRunning {
                fix: "Wait".to_string(),
            },
        ];

        for error in errors {
            assert!(
                !error.fix_suggestion().is_empty(),
                "fix_suggestion() should return non-empty string for {:?}",
                error
            );
        }
    }

    #[test]
    fn test_unsupported_platform_display() {
        let error = InstallError::UnsupportedPlatform {
            platform: Platform::MacOs,
            fix: "Install Crystal manually".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Automatic toolchain installation is not supported on macOS"
        );
    }
}
