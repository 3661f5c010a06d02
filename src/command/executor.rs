//! Running external processes to completion.
//!
//! The [`CommandExecutor`] trait is the seam between the installer and the
//! operating system. [`SystemExecutor`] spawns real processes through
//! `tokio::process`; tests substitute scripted executors.

use super::path_finder::find_executable;
use super::{CommandError, CommandResult, CommandSpec};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs one external command and reports what it produced.
///
/// Implementations must fail with [`CommandError::NotFound`] when the
/// executable cannot be located and with [`CommandError::NonZeroExit`] when it
/// exits unsuccessfully. `error_message`, when given, replaces the generated
/// message of the returned error.
pub trait CommandExecutor: Send + Sync {
    /// Execute `spec`, wait for it to exit and capture its output.
    fn execute(
        &self,
        spec: &CommandSpec,
        error_message: Option<&str>,
    ) -> impl Future<Output = Result<CommandResult, CommandError>> + Send;
}

/// Executor backed by real child processes.
///
/// Both output streams are buffered in memory until the child exits. There is
/// no retry; a failed invocation surfaces immediately. Without a timeout a
/// hung child blocks the caller indefinitely. Children are killed if the
/// returned future is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use cosmo_installer::{CommandExecutor, CommandSpec, SystemExecutor};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let executor = SystemExecutor::new();
///     match executor.execute(&CommandSpec::new("git").arg("--version"), None).await {
///         Ok(result) => println!("{}", result.stdout.trim()),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
}

impl SystemExecutor {
    /// Executor that waits for every command indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `limit`.
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }
}

impl CommandExecutor for SystemExecutor {
    async fn execute(
        &self,
        spec: &CommandSpec,
        error_message: Option<&str>,
    ) -> Result<CommandResult, CommandError> {
        let program = find_executable(&spec.program)
            .ok_or_else(|| CommandError::not_found(&spec.program, error_message))?;

        let mut command = Command::new(&program);
        command
            .args(&spec.args)
            .envs(spec.env_vars.iter().cloned())
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        debug!(command = %spec, program = %program.display(), "executing");

        let output = match self.timeout {
            Some(limit) => timeout(limit, command.output())
                .await
                .map_err(|_| CommandError::timeout(spec, limit, error_message))?,
            None => command.output().await,
        };
        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CommandError::not_found(&spec.program, error_message)
            } else {
                CommandError::spawn(spec, e, error_message)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);

        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!(command = %spec.program, "stderr: {}", line);
        }

        if !output.status.success() {
            return Err(CommandError::non_zero_exit(spec, exit_code, stderr, error_message));
        }

        Ok(CommandResult {
            stdout,
            stderr,
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable_is_not_found() {
        let executor = SystemExecutor::new();
        let result = executor
            .execute(&CommandSpec::new("definitely_not_a_real_executable_12345"), None)
            .await;
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_missing_executable_uses_override() {
        let executor = SystemExecutor::new();
        let err = executor
            .execute(
                &CommandSpec::new("definitely_not_a_real_executable_12345"),
                Some("Failed to clone the repository (is git installed?)"),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to clone the repository (is git installed?)"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let executor = SystemExecutor::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err 1>&2"]);
        let result = executor.execute(&spec, None).await.unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let executor = SystemExecutor::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo broken 1>&2; exit 3"]);
        let err = executor.execute(&spec, None).await.unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.stderr(), Some("broken\n"));
        assert!(err.to_string().contains("exited with code 3"));
        assert!(err.to_string().contains("broken"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_current_dir_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let executor = SystemExecutor::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "pwd; echo $COSMO_TEST_VAR"])
            .env("COSMO_TEST_VAR", "hello")
            .current_dir(dir.path());
        let result = executor.execute(&spec, None).await.unwrap();

        let mut lines = result.stdout.lines();
        let pwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
        assert_eq!(pwd, std::fs::canonicalize(dir.path()).unwrap());
        assert_eq!(lines.next(), Some("hello"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_command() {
        let executor = SystemExecutor::new().with_timeout(Some(Duration::from_millis(100)));
        let spec = CommandSpec::new("sh").args(["-c", "sleep 5"]);
        let err = executor.execute(&spec, None).await.unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
    }
}
