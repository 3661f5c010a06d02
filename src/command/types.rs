//! Type definitions for external command execution.
//!
//! [`CommandSpec`] describes a process to launch, [`CommandResult`] captures
//! what it produced.

use crate::Platform;
use std::fmt;
use std::path::{Path, PathBuf};

/// A structured command for programmatic execution.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::CommandSpec;
///
/// let cmd = CommandSpec::new("git").args(["describe", "--tags", "--abbrev=0"]);
/// assert_eq!(cmd.to_string(), "git describe --tags --abbrev=0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute (e.g., "git", "sh", "scoop").
    pub program: String,

    /// Arguments to pass to the program.
    pub args: Vec<String>,

    /// Environment variables to set before execution (key, value pairs).
    pub env_vars: Vec<(String, String)>,

    /// Working directory, or the process directory when `None`.
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Start a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env_vars: Vec::new(),
            current_dir: None,
        }
    }

    /// A one-line script run through the platform shell.
    ///
    /// Windows uses `powershell.exe -NoProfile -Command`, every other
    /// platform uses `sh -c`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cosmo_installer::{CommandSpec, Platform};
    ///
    /// let cmd = CommandSpec::shell(Platform::Linux, "rm -f shard.lock");
    /// assert_eq!(cmd.program, "sh");
    /// assert_eq!(cmd.args, vec!["-c", "rm -f shard.lock"]);
    /// ```
    pub fn shell(platform: Platform, script: impl Into<String>) -> Self {
        match platform {
            Platform::Windows => {
                Self::new("powershell.exe").args(["-NoProfile", "-Command"]).arg(script)
            }
            _ => Self::new("sh").arg("-c").arg(script),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Run the command inside `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Output captured from a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Everything the process wrote to stdout.
    pub stdout: String,

    /// Everything the process wrote to stderr.
    pub stderr: String,

    /// Exit code (`-1` when the process was terminated by a signal).
    pub exit_code: i32,
}

impl CommandResult {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
