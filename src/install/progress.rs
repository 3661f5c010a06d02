//! Progress reporting types for installation runs.
//!
//! A run moves through the [`InstallStage`] states in a fixed order and
//! reports everything that happens as [`InstallEvent`]s delivered to a
//! caller-supplied callback.

use crate::ReleaseTag;

/// Number of discrete progress steps in the longest run.
///
/// Each completed step is worth `100 / TOTAL_STEPS` percent.
pub const TOTAL_STEPS: u8 = 13;

/// Percentage reported after `steps` completed steps, rounded down.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::{percent_for, TOTAL_STEPS};
///
/// assert_eq!(percent_for(1), 7);
/// assert_eq!(percent_for(12), 92);
/// assert_eq!(percent_for(TOTAL_STEPS), 100);
/// ```
pub fn percent_for(steps: u8) -> u8 {
    let steps = u32::from(steps.min(TOTAL_STEPS));
    (steps * 100 / u32::from(TOTAL_STEPS)) as u8
}

/// States of the installation state machine.
///
/// Stages are entered in declaration order. `ToolchainInstall` is skipped
/// when the toolchain is already present; `Errored` is reachable from every
/// non-terminal stage and absorbs the run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display,
)]
pub enum InstallStage {
    /// No run has started.
    Idle,
    /// Checking for administrator privileges where required.
    ElevationCheck,
    /// Creating the target directory.
    DirectorySetup,
    /// Entering the target directory.
    WorkingDirectoryChange,
    /// Cloning or updating the repository.
    RepositorySync,
    /// Fetching tags and resolving the latest release.
    TagResolution,
    /// Checking out the latest release.
    Checkout,
    /// Probing for the toolchain.
    ToolchainCheck,
    /// Installing the toolchain through the platform package manager.
    ToolchainInstall,
    /// Installing project dependencies and building.
    Build,
    /// The run completed successfully.
    Finished,
    /// The run halted on a fatal error.
    Errored,
}

impl InstallStage {
    /// Whether no further stage can follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Errored)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::InstallStage;
    ///
    /// assert!(InstallStage::ToolchainCheck.can_advance_to(InstallStage::Build));
    /// assert!(InstallStage::Checkout.can_advance_to(InstallStage::Errored));
    /// assert!(!InstallStage::Build.can_advance_to(InstallStage::Checkout));
    /// assert!(!InstallStage::Finished.can_advance_to(InstallStage::Errored));
    /// ```
    pub fn can_advance_to(&self, next: InstallStage) -> bool {
        use InstallStage::*;
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (_, Errored) => true,
            (ToolchainCheck, Build) => true,
            (from, to) => to as u8 == *from as u8 + 1,
        }
    }
}

/// Notifications emitted during a run.
///
/// `Errored` and `Finished` are mutually exclusive; exactly one of them is
/// emitted per run, and it is always the last event.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::InstallEvent;
///
/// fn on_event(event: InstallEvent) {
///     match event {
///         InstallEvent::StageChanged { stage } => println!("-> {}", stage),
///         InstallEvent::Status { label } => println!("{}", label),
///         InstallEvent::Progress { percent } => println!("{}%", percent),
///         InstallEvent::Errored { message, fix } => eprintln!("{} ({})", message, fix),
///         InstallEvent::Finished { release } => println!("Installed {}", release),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    /// The state machine entered a new stage.
    StageChanged {
        /// The stage just entered.
        stage: InstallStage,
    },

    /// Human-readable description of the current activity.
    Status {
        /// Label suitable for a window title or status line.
        label: String,
    },

    /// Overall completion changed.
    Progress {
        /// Completion percentage, 0 to 100.
        percent: u8,
    },

    /// The run halted on a fatal error.
    Errored {
        /// What went wrong.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The run completed successfully.
    Finished {
        /// The release that was checked out and built.
        release: ReleaseTag,
    },
}

impl InstallEvent {
    /// Whether this event ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Errored { .. } | Self::Finished { .. })
    }
}
