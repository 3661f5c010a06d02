//! cosmo-installer CLI entry point
//!
//! Parses arguments, sets up logging, resolves the target directory and
//! drives one installation run while rendering its progress on the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use cosmo_installer::{
    InstallEvent, InstallationRequest, Installer, InstallerConfig, Platform, SystemExecutor,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Install the Cosmo language and the Crystal toolchain.
#[derive(Debug, Parser)]
#[command(name = "cosmo-installer", version, about)]
struct Cli {
    /// Folder to install into.
    ///
    /// The project folder (`cosmo` on Windows, `.cosmo` elsewhere) is created
    /// inside it. Defaults to `C:\Program Files` on Windows, `/Applications`
    /// on macOS and the home directory elsewhere.
    #[arg(long, env = "COSMO_INSTALL_DIR")]
    dir: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(long, env = "COSMO_INSTALLER_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn init_logging(&self) {
        let filter = match self.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("cosmo_installer=debug"),
            _ => EnvFilter::new("trace"),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    fn load_config(&self) -> Result<InstallerConfig> {
        match &self.config {
            Some(path) => Ok(InstallerConfig::load(path)?),
            None => Ok(InstallerConfig::default()),
        }
    }

    fn request(&self, platform: Platform, config: &InstallerConfig) -> Result<InstallationRequest> {
        let parent = match &self.dir {
            Some(dir) => dir.clone(),
            None => platform
                .default_parent_dir()
                .context("Could not determine a default installation directory; pass --dir")?,
        };
        InstallationRequest::in_parent(&parent, platform, &config.project_dir_name)
            .with_context(|| format!("Invalid installation directory {}", parent.display()))
    }
}

/// Whether the process holds administrator rights.
///
/// `net session` only succeeds for elevated processes on Windows.
async fn is_elevated(platform: Platform) -> bool {
    if !platform.requires_elevation() {
        return true;
    }
    tokio::process::Command::new("net")
        .arg("session")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    bar.set_style(style);
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    let platform = Platform::current();
    let config = cli.load_config()?;
    let request = cli.request(platform, &config)?;
    let elevated = is_elevated(platform).await;

    let executor = SystemExecutor::new().with_timeout(config.command_timeout());
    let installer =
        Installer::new(executor, platform, config).with_elevation_check(move || elevated);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        installer
            .run(&request, move |event| {
                let _ = tx.send(event);
            })
            .await
    });

    let bar = progress_bar(cli.no_progress);
    while let Some(event) = rx.recv().await {
        match event {
            InstallEvent::Status { label } => {
                if cli.no_progress {
                    println!("{}", label);
                }
                bar.set_message(label);
            }
            InstallEvent::Progress { percent } => bar.set_position(u64::from(percent)),
            InstallEvent::Finished { release } => {
                bar.finish_with_message(format!("Installed Cosmo {}", release));
            }
            InstallEvent::Errored { .. } => bar.abandon(),
            InstallEvent::StageChanged { .. } => {}
        }
    }

    match task.await.context("Installation task panicked")? {
        Ok(report) => {
            println!("Cosmo {} is ready.", report.release);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Fix: {}", e.fix_suggestion());
            std::process::exit(1);
        }
    }
}
