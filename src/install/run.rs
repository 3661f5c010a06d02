//! Run-scoped state of one installation.

use super::progress::{percent_for, InstallEvent, InstallStage, TOTAL_STEPS};
use super::InstallError;
use crate::ReleaseTag;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Event sink shared by every step of a run.
pub(crate) type EventSink<'a> = &'a (dyn Fn(InstallEvent) + Send + Sync);

/// Mutable state owned by exactly one run.
///
/// Every step function receives this context explicitly; nothing about a run
/// lives in shared or static state.
pub(crate) struct InstallRun<'a> {
    stage: InstallStage,
    steps: u8,
    errored: bool,
    finished: bool,
    work_dir: PathBuf,
    on_event: EventSink<'a>,
}

impl<'a> InstallRun<'a> {
    pub(crate) fn new(work_dir: impl Into<PathBuf>, on_event: EventSink<'a>) -> Self {
        Self {
            stage: InstallStage::Idle,
            steps: 0,
            errored: false,
            finished: false,
            work_dir: work_dir.into(),
            on_event,
        }
    }

    pub(crate) fn stage(&self) -> InstallStage {
        self.stage
    }

    pub(crate) fn steps(&self) -> u8 {
        self.steps
    }

    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub(crate) fn set_work_dir(&mut self, dir: PathBuf) {
        self.work_dir = dir;
    }

    /// Move the state machine to `stage`.
    pub(crate) fn enter(&mut self, stage: InstallStage) {
        debug_assert!(
            self.stage.can_advance_to(stage),
            "invalid transition {} -> {}",
            self.stage,
            stage
        );
        info!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
        self.emit(InstallEvent::StageChanged { stage });
    }

    /// Report a human-readable status label.
    pub(crate) fn status(&self, label: impl Into<String>) {
        let label = label.into();
        debug!(stage = %self.stage, "{}", label);
        self.emit(InstallEvent::Status { label });
    }

    /// Complete one progress step and report the new percentage.
    pub(crate) fn advance(&mut self) {
        self.steps = (self.steps + 1).min(TOTAL_STEPS);
        self.emit(InstallEvent::Progress {
            percent: percent_for(self.steps),
        });
    }

    /// Halt the run with `error`. Has no effect once the run is terminal.
    pub(crate) fn fail(&mut self, error: &InstallError) {
        if self.is_terminal() {
            return;
        }
        self.errored = true;
        self.stage = InstallStage::Errored;
        self.emit(InstallEvent::StageChanged {
            stage: InstallStage::Errored,
        });
        self.emit(InstallEvent::Errored {
            message: error.to_string(),
            fix: error.fix_suggestion().to_string(),
        });
    }

    /// Complete the run. Has no effect once the run is terminal.
    ///
    /// Success always reports 100%, even on paths that skip steps.
    pub(crate) fn finish(&mut self, release: &ReleaseTag) {
        if self.is_terminal() {
            return;
        }
        self.finished = true;
        self.enter(InstallStage::Finished);
        self.emit(InstallEvent::Progress { percent: 100 });
        self.status("Done! 🎉");
        self.emit(InstallEvent::Finished {
            release: release.clone(),
        });
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.errored || self.finished
    }

    fn emit(&self, event: InstallEvent) {
        (self.on_event)(event);
    }
}
