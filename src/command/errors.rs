//! Error types for external command execution.

use super::CommandSpec;
use std::time::Duration;
use thiserror::Error;

/// Ways a single external command can fail.
///
/// Each variant renders as its `message`, which is either the caller's
/// override or a generated description of what went wrong.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    /// The executable could not be located.
    #[error("{message}")]
    NotFound {
        /// Program that was looked up.
        program: String,
        /// Message shown to the user.
        message: String,
    },

    /// The process could not be started for another reason.
    #[error("{message}")]
    Spawn {
        /// Full command line.
        command: String,
        /// Message shown to the user.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero status.
    #[error("{message}")]
    NonZeroExit {
        /// Full command line.
        command: String,
        /// Exit code (`-1` when terminated by a signal).
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
        /// Message shown to the user.
        message: String,
    },

    /// The process succeeded but printed nothing where output was required.
    #[error("{message}")]
    EmptyOutput {
        /// Full command line.
        command: String,
        /// Message shown to the user.
        message: String,
    },

    /// The process exceeded the configured timeout and was killed.
    #[error("{message}")]
    Timeout {
        /// Full command line.
        command: String,
        /// How long the command was allowed to run.
        duration: Duration,
        /// Message shown to the user.
        message: String,
    },
}

impl CommandError {
    pub(crate) fn not_found(program: &str, error_message: Option<&str>) -> Self {
        Self::NotFound {
            program: program.to_string(),
            message: error_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("Command '{}' was not found on PATH", program)),
        }
    }

    pub(crate) fn spawn(
        spec: &CommandSpec,
        source: std::io::Error,
        error_message: Option<&str>,
    ) -> Self {
        Self::Spawn {
            command: spec.to_string(),
            message: error_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failed to start '{}': {}", spec, source)),
            source,
        }
    }

    pub(crate) fn non_zero_exit(
        spec: &CommandSpec,
        exit_code: i32,
        stderr: String,
        error_message: Option<&str>,
    ) -> Self {
        let message = error_message.map(str::to_string).unwrap_or_else(|| {
            format!("Command '{}' exited with code {}\n{}", spec, exit_code, stderr)
        });
        Self::NonZeroExit {
            command: spec.to_string(),
            exit_code,
            stderr,
            message,
        }
    }

    pub(crate) fn timeout(spec: &CommandSpec, duration: Duration, error_message: Option<&str>) -> Self {
        Self::Timeout {
            command: spec.to_string(),
            duration,
            message: error_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("Command '{}' timed out after {:?}", spec, duration)),
        }
    }

    pub(crate) fn empty_output(spec: &CommandSpec, error_message: Option<&str>) -> Self {
        Self::EmptyOutput {
            command: spec.to_string(),
            message: error_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("Command '{}' produced no output", spec)),
        }
    }

    /// Whether the executable itself is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Exit code of the failed process, when it ran at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Captured stderr of the failed process, when it ran at all.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// The command line (or program name) that failed.
    pub fn command(&self) -> &str {
        match self {
            Self::NotFound { program, .. } => program,
            Self::Spawn { command, .. }
            | Self::NonZeroExit { command, .. }
            | Self::EmptyOutput { command, .. }
            | Self::Timeout { command, .. } => command,
        }
    }
}
