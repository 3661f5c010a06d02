//! Installation orchestration.
//!
//! This module provides [`Installer`], which sequences every step of an
//! installation run and reports progress through a callback.

use super::progress::InstallStage;
use super::run::InstallRun;
use super::{InstallError, InstallEvent};
use crate::command::{CommandExecutor, CommandSpec};
use crate::git::GitClient;
use crate::toolchain::{Provisioner, TOOLCHAIN_NAME};
use crate::{InstallationRequest, InstallerConfig, Platform, ReleaseTag};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The release that was checked out and built.
    pub release: ReleaseTag,
    /// Whether the toolchain had to be installed during this run.
    pub toolchain_installed: bool,
    /// Progress steps completed before the run finished.
    pub steps: u8,
}

/// Drives installation runs.
///
/// An `Installer` is configured once (executor, platform, config, elevation
/// predicate) and can run any number of times, one at a time. A second `run`
/// while one is in progress fails with [`InstallError::AlreadyRunning`].
///
/// # Example
///
/// ```rust,no_run
/// use cosmo_installer::{InstallationRequest, Installer, InstallerConfig, Platform, SystemExecutor};
///
/// #[tokio::main]
/// async fn main() {
///     let installer = Installer::new(SystemExecutor::new(), Platform::current(), InstallerConfig::default());
///     let request = InstallationRequest::new("/home/u/.cosmo");
///
///     match installer.run(&request, |event| println!("{:?}", event)).await {
///         Ok(report) => println!("Installed {}", report.release),
///         Err(e) => println!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub struct Installer<E> {
    executor: E,
    platform: Platform,
    provisioner: Provisioner,
    config: InstallerConfig,
    is_elevated: Box<dyn Fn() -> bool + Send + Sync>,
    busy: AtomicBool,
}

/// Clears the busy flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: CommandExecutor> Installer<E> {
    /// Create an installer for `platform`.
    ///
    /// The process is assumed to be elevated until
    /// [`with_elevation_check`](Self::with_elevation_check) says otherwise.
    pub fn new(executor: E, platform: Platform, config: InstallerConfig) -> Self {
        Self {
            executor,
            platform,
            provisioner: Provisioner::for_platform(platform),
            config,
            is_elevated: Box::new(|| true),
            busy: AtomicBool::new(false),
        }
    }

    /// Use `check` to decide whether the process runs with elevated privileges.
    ///
    /// Only consulted on platforms that require elevation.
    pub fn with_elevation_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.is_elevated = Box::new(check);
        self
    }

    /// The platform this installer provisions for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The executor commands are run through.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The active configuration.
    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Whether a run is currently in progress.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Perform one installation run.
    ///
    /// Every step runs strictly in order and each external command is awaited
    /// to completion. `on_event` receives stage changes, status labels and
    /// progress, followed by exactly one `Errored` or `Finished` event. Errors
    /// are also returned; nothing applied before the failure is rolled back,
    /// so a later run resumes from what is on disk.
    #[instrument(skip(self, on_event), fields(dir = %request.target_path.display()))]
    pub async fn run<F>(
        &self,
        request: &InstallationRequest,
        on_event: F,
    ) -> Result<InstallReport, InstallError>
    where
        F: Fn(InstallEvent) + Send + Sync,
    {
        let Some(_guard) = RunGuard::acquire(&self.busy) else {
            return Err(InstallError::AlreadyRunning {
                fix: "Wait for the current installation to finish".to_string(),
            });
        };

        let mut run = InstallRun::new(&request.target_path, &on_event);
        match self.execute_steps(&mut run, request).await {
            Ok((release, toolchain_installed)) => {
                run.finish(&release);
                info!(release = %release, steps = run.steps(), "installation finished");
                Ok(InstallReport {
                    release,
                    toolchain_installed,
                    steps: run.steps(),
                })
            }
            Err(error) => {
                info!(stage = %run.stage(), error = %error, "installation failed");
                run.fail(&error);
                Err(error)
            }
        }
    }

    async fn execute_steps(
        &self,
        run: &mut InstallRun<'_>,
        request: &InstallationRequest,
    ) -> Result<(ReleaseTag, bool), InstallError> {
        run.enter(InstallStage::ElevationCheck);
        self.check_elevation()?;

        run.enter(InstallStage::DirectorySetup);
        run.status("Creating installation environment...");
        if prepare_directory(&request.target_path).await? {
            run.status("Installation directory exists, skipping creation...");
        }
        run.advance();

        run.enter(InstallStage::WorkingDirectoryChange);
        run.status("Changing environment directory...");
        let work_dir = tokio::fs::canonicalize(&request.target_path)
            .await
            .map_err(|e| {
                InstallError::filesystem("Failed to change directory", &request.target_path, e)
            })?;
        run.set_work_dir(work_dir);
        run.advance();

        run.enter(InstallStage::RepositorySync);
        run.status("Pulling repository...");
        self.sync_repository(run).await?;
        run.advance();

        let work_dir = run.work_dir().to_path_buf();
        let git = GitClient::new(&self.executor, &work_dir);

        run.enter(InstallStage::TagResolution);
        run.status("Fetching tags...");
        git.fetch_tags().await?;
        run.advance();

        run.status("Fetching latest release...");
        let release = ReleaseTag::new(git.latest_tag().await?);
        info!(release = %release, "resolved latest release");
        run.advance();

        run.enter(InstallStage::Checkout);
        run.status(format!("Checking out latest release ({})...", release));
        git.checkout(release.name()).await?;
        run.advance();

        run.enter(InstallStage::ToolchainCheck);
        run.status(format!("Checking for {} installation...", TOOLCHAIN_NAME));
        let installed = self.provisioner.probe(&self.executor, &work_dir).await;
        run.advance();

        if installed {
            run.status(format!("{} already installed!", TOOLCHAIN_NAME));
        } else {
            run.enter(InstallStage::ToolchainInstall);
            run.status(format!("Installing {}...", TOOLCHAIN_NAME));
            self.provisioner.install(&self.executor, run).await?;
        }

        run.enter(InstallStage::Build);
        run.status("Building Cosmo...");
        self.build(&work_dir).await?;
        run.advance();

        Ok((release, !installed))
    }

    fn check_elevation(&self) -> Result<(), InstallError> {
        if self.platform.requires_elevation() && !(self.is_elevated)() {
            return Err(InstallError::PermissionDenied {
                message: "You are not running with elevated privileges".to_string(),
                fix: "Restart the installer as an administrator and try again".to_string(),
            });
        }
        Ok(())
    }

    /// Clone into an empty directory, or update a partial checkout in place.
    async fn sync_repository(&self, run: &InstallRun<'_>) -> Result<(), InstallError> {
        let work_dir = run.work_dir();
        let git = GitClient::new(&self.executor, work_dir);

        if is_empty_dir(work_dir).await? {
            info!(url = %self.config.repository_url, "cloning into empty directory");
            git.clone_into(&self.config.repository_url).await?;
            return Ok(());
        }

        info!("directory has content, updating existing checkout");
        let remove_lock = self.remove_lock_command().current_dir(work_dir);
        let message = format!("Failed to remove {}", self.config.lock_file);
        self.executor.execute(&remove_lock, Some(&message)).await?;

        git.pull_unrelated(&self.config.remote, &self.config.branch)
            .await?;
        Ok(())
    }

    fn remove_lock_command(&self) -> CommandSpec {
        let lock = &self.config.lock_file;
        match self.platform {
            Platform::Windows => CommandSpec::shell(
                self.platform,
                format!(
                    "if (Test-Path ./{lock}) {{ Remove-Item -Force ./{lock} }}",
                    lock = lock
                ),
            ),
            _ => CommandSpec::new("rm").args(["-f", lock.as_str()]),
        }
    }

    async fn build(&self, work_dir: &Path) -> Result<(), InstallError> {
        let install = CommandSpec::new("shards")
            .args(["install", "--production"])
            .current_dir(work_dir);
        self.executor
            .execute(&install, Some("Failed to build Cosmo"))
            .await?;

        let build = CommandSpec::new("shards").arg("build").current_dir(work_dir);
        self.executor
            .execute(&build, Some("Failed to build Cosmo"))
            .await?;
        Ok(())
    }
}

/// Create `path` unless it already exists as a directory.
///
/// Returns `true` when the directory was already there.
async fn prepare_directory(path: &Path) -> Result<bool, InstallError> {
    if !path.is_absolute() {
        return Err(InstallError::filesystem(
            "Installation path must be absolute",
            path,
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        ));
    }

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            info!("installation directory exists, skipping creation");
            Ok(true)
        }
        Ok(_) => Err(InstallError::filesystem(
            "Failed to create directory",
            path,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "a file with that name already exists",
            ),
        )),
        Err(_) => tokio::fs::create_dir_all(path)
            .await
            .map(|()| false)
            .map_err(|e| InstallError::filesystem("Failed to create directory", path, e)),
    }
}

async fn is_empty_dir(path: &Path) -> Result<bool, InstallError> {
    let read_error = |e| InstallError::filesystem("Failed to read the directory", path, e);
    let mut entries = tokio::fs::read_dir(path).await.map_err(read_error)?;
    Ok(entries.next_entry().await.map_err(read_error)?.is_none())
}
