//! # cosmo-installer
//!
//! Installer for the Cosmo language. It fetches the Cosmo sources into a
//! target directory, checks out the latest tagged release, makes sure the
//! Crystal toolchain is available (installing it through Scoop on Windows or
//! APT on Linux) and builds Cosmo with `shards`.
//!
//! ## Features
//!
//! - `Installer` drives one run at a time through a fixed sequence of stages
//! - `InstallEvent` callbacks report stage changes, status labels and progress
//! - `InstallError` carries an actionable fix suggestion for every failure
//! - `CommandExecutor` abstracts process execution so runs can be scripted in tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use cosmo_installer::{InstallEvent, InstallationRequest, Installer, InstallerConfig, Platform, SystemExecutor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let platform = Platform::current();
//!     let parent = platform.default_parent_dir().expect("no home directory");
//!     let request = InstallationRequest::in_parent(&parent, platform, "cosmo").unwrap();
//!
//!     let installer = Installer::new(SystemExecutor::new(), platform, InstallerConfig::default());
//!     let result = installer
//!         .run(&request, |event| {
//!             if let InstallEvent::Status { label } = event {
//!                 println!("{}", label);
//!             }
//!         })
//!         .await;
//!
//!     if let Err(e) = result {
//!         eprintln!("{}\n{}", e, e.fix_suggestion());
//!     }
//! }
//! ```

mod command;
mod config;
mod git;
mod install;
mod platform;
mod release;
mod request;
mod toolchain;

pub use command::{CommandError, CommandExecutor, CommandResult, CommandSpec, SystemExecutor};
pub use config::{ConfigError, InstallerConfig};
pub use git::GitClient;
pub use install::{
    percent_for, InstallError, InstallEvent, InstallReport, InstallStage, Installer, TOTAL_STEPS,
};
pub use platform::Platform;
pub use release::ReleaseTag;
pub use request::InstallationRequest;
pub use toolchain::{Provisioner, TOOLCHAIN_INSTALL_URL, TOOLCHAIN_NAME, TOOLCHAIN_PROGRAM};
