//! Crystal toolchain provisioning.
//!
//! A [`Provisioner`] is selected once per platform. It probes for the
//! toolchain and, when it is missing, installs it through the platform
//! package manager. Each installation sub-step completes exactly one progress
//! step of the surrounding run.

mod apt;
mod scoop;

use crate::command::{CommandExecutor, CommandSpec};
use crate::install::{InstallError, InstallRun};
use crate::Platform;
use std::path::Path;
use tracing::{debug, warn};

/// Display name of the toolchain.
pub const TOOLCHAIN_NAME: &str = "Crystal";

/// Executable probed to detect the toolchain.
pub const TOOLCHAIN_PROGRAM: &str = "crystal";

/// Where to send users on platforms without automatic provisioning.
pub const TOOLCHAIN_INSTALL_URL: &str = "https://crystal-lang.org/install/";

/// Platform strategy for ensuring the toolchain is available.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::{Platform, Provisioner};
///
/// assert_eq!(Provisioner::for_platform(Platform::Linux), Provisioner::Apt);
/// assert_eq!(Provisioner::for_platform(Platform::Windows), Provisioner::Scoop);
/// assert!(!Provisioner::for_platform(Platform::MacOs).can_install());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioner {
    /// Windows: install `crystal-preview` from a Scoop bucket.
    Scoop,
    /// Linux: install `crystal` from the vendor APT repository.
    Apt,
    /// No automatic installation; a missing toolchain is a fatal error.
    Unsupported(Platform),
}

impl Provisioner {
    /// The strategy for `platform`.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self::Scoop,
            Platform::Linux => Self::Apt,
            other => Self::Unsupported(other),
        }
    }

    /// Whether this strategy can install the toolchain by itself.
    pub fn can_install(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Number of progress steps [`install`](Self::install) completes.
    pub fn install_steps(&self) -> u8 {
        match self {
            Self::Scoop => scoop::STEPS,
            Self::Apt => apt::STEPS,
            Self::Unsupported(_) => 0,
        }
    }

    /// Whether the toolchain is installed.
    ///
    /// Runs `crystal -v`. A missing executable or a failing probe both mean
    /// "not installed"; neither is an error.
    pub async fn probe<E: CommandExecutor>(&self, executor: &E, work_dir: &Path) -> bool {
        let spec = CommandSpec::new(TOOLCHAIN_PROGRAM)
            .arg("-v")
            .current_dir(work_dir);
        match executor.execute(&spec, None).await {
            Ok(result) => {
                debug!(version = %result.stdout.lines().next().unwrap_or_default(), "toolchain found");
                true
            }
            Err(e) if e.is_not_found() => {
                debug!("{} not found on PATH", TOOLCHAIN_PROGRAM);
                false
            }
            Err(e) => {
                warn!(error = %e, "toolchain probe failed, treating as not installed");
                false
            }
        }
    }

    /// Install the toolchain, advancing `run` once per sub-step.
    pub(crate) async fn install<E: CommandExecutor>(
        &self,
        executor: &E,
        run: &mut InstallRun<'_>,
    ) -> Result<(), InstallError> {
        match self {
            Self::Scoop => scoop::install(executor, run).await,
            Self::Apt => apt::install(executor, run).await,
            Self::Unsupported(platform) => Err(InstallError::UnsupportedPlatform {
                platform: *platform,
                fix: format!(
                    "Install {} manually from {} and re-run the installer",
                    TOOLCHAIN_NAME, TOOLCHAIN_INSTALL_URL
                ),
            }),
        }
    }
}
