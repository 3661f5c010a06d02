//! Scripted in-memory executor for unit tests.

use super::{CommandError, CommandExecutor, CommandResult, CommandSpec};
use std::sync::Mutex;

/// Canned outcome for commands matching a pattern.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Stdout(&'static str),
    Exit(i32),
    NotFound,
}

/// Records every command and answers from a list of `(pattern, reply)` rules.
///
/// The first rule whose pattern is a substring of the rendered command line
/// wins; unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub(crate) struct ScriptedExecutor {
    rules: Vec<(&'static str, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(mut self, pattern: &'static str, reply: Reply) -> Self {
        self.rules.push((pattern, reply));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn called(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }

    pub(crate) fn position(&self, pattern: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(pattern))
    }
}

impl CommandExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        spec: &CommandSpec,
        error_message: Option<&str>,
    ) -> Result<CommandResult, CommandError> {
        let line = spec.to_string();
        self.calls.lock().unwrap().push(line.clone());

        let reply = self
            .rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::NotFound) => Err(CommandError::not_found(&spec.program, error_message)),
            Some(Reply::Exit(code)) => Err(CommandError::non_zero_exit(
                spec,
                code,
                "scripted failure\n".to_string(),
                error_message,
            )),
            Some(Reply::Stdout(stdout)) => Ok(CommandResult {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: 0,
            }),
            None => Ok(CommandResult {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            }),
        }
    }
}
