//! Installation orchestration for Cosmo.
//!
//! [`Installer::run`] drives one provisioning run through the
//! [`InstallStage`] state machine, reporting [`InstallEvent`]s to the caller
//! and failing with an [`InstallError`] that carries a fix suggestion.

mod errors;
mod orchestrator;
mod progress;
mod run;

pub use errors::InstallError;
pub use orchestrator::{InstallReport, Installer};
pub use progress::{percent_for, InstallEvent, InstallStage, TOTAL_STEPS};

pub(crate) use run::InstallRun;
