//! Crystal installation through Scoop.

use crate::command::{CommandExecutor, CommandSpec};
use crate::install::{InstallError, InstallRun};
use crate::Platform;
use tracing::{info, warn};

/// Progress steps completed by [`install`].
pub(super) const STEPS: u8 = 4;

const SCOOP_URL: &str = "https://scoop.sh";
const BUCKET_NAME: &str = "crystal-preview";
const BUCKET_URL: &str = "https://github.com/neatorobito/scoop-crystal";
const PACKAGE: &str = "crystal-preview";

/// Substring in the linker location that marks a conflicting IDE toolchain.
const CONFLICT_MARKER: &str = "Visual Studio";

/// Verify Scoop, register the Crystal bucket, guard against a conflicting
/// Visual Studio toolchain and install the package.
pub(super) async fn install<E: CommandExecutor>(
    executor: &E,
    run: &mut InstallRun<'_>,
) -> Result<(), InstallError> {
    let work_dir = run.work_dir().to_path_buf();

    run.status("Checking for Scoop installation...");
    let probe = CommandSpec::shell(Platform::Windows, "scoop --version").current_dir(&work_dir);
    if let Err(e) = executor.execute(&probe, None).await {
        warn!(error = %e, "scoop probe failed");
        return Err(InstallError::DependencyMissing {
            name: "Scoop".to_string(),
            install_url: Some(SCOOP_URL.to_string()),
            fix: format!(
                "Scoop is required to install Crystal on Windows. Install it from {}, \
                 or install Crystal manually and re-run the installer.",
                SCOOP_URL
            ),
        });
    }
    info!("found scoop");
    run.advance();

    run.status("Adding Crystal bucket...");
    let buckets = executor
        .execute(
            &CommandSpec::new("scoop").args(["bucket", "list"]).current_dir(&work_dir),
            Some("Failed to list Scoop buckets"),
        )
        .await?;
    if buckets.stdout.lines().any(|l| l.split_whitespace().next() == Some(BUCKET_NAME)) {
        info!(bucket = BUCKET_NAME, "bucket already registered");
    } else {
        let add = CommandSpec::new("scoop")
            .args(["bucket", "add", BUCKET_NAME, BUCKET_URL])
            .current_dir(&work_dir);
        executor
            .execute(&add, Some("Failed to add Crystal bucket"))
            .await?;
    }
    run.advance();

    run.status("Checking for conflicting toolchains...");
    check_linker_conflict(executor, &work_dir).await?;
    run.advance();

    run.status("Installing Crystal via Scoop...");
    let package = CommandSpec::new("scoop")
        .args(["install", PACKAGE])
        .current_dir(&work_dir);
    executor
        .execute(&package, Some("Failed to install Crystal via Scoop"))
        .await?;
    run.advance();

    Ok(())
}

/// Fail when `cl.exe` resolves into a Visual Studio installation.
///
/// This is a best-effort substring check on `where cl.exe`. A failing or
/// missing `where` means no linker was found, which is not a conflict.
async fn check_linker_conflict<E: CommandExecutor>(
    executor: &E,
    work_dir: &std::path::Path,
) -> Result<(), InstallError> {
    let locate = CommandSpec::new("where").arg("cl.exe").current_dir(work_dir);
    let output = match executor.execute(&locate, None).await {
        Ok(result) => result.stdout,
        Err(e) => {
            info!(error = %e, "no cl.exe found");
            return Ok(());
        }
    };

    if output.contains(CONFLICT_MARKER) {
        return Err(InstallError::ConflictingInstallation {
            name: CONFLICT_MARKER.to_string(),
            fix: "Visual Studio is currently installed on your system. \
                  Please uninstall Visual Studio before installing Crystal."
                .to_string(),
        });
    }
    Ok(())
}
