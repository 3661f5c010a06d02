//! Thin git client over a [`CommandExecutor`].

use crate::command::{CommandError, CommandExecutor, CommandSpec};
use std::path::Path;

/// Runs git subcommands inside one working directory.
///
/// Output is returned with surrounding whitespace trimmed; no other parsing
/// happens here.
///
/// # Example
///
/// ```rust,no_run
/// use cosmo_installer::{GitClient, SystemExecutor};
/// use std::path::Path;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let executor = SystemExecutor::new();
///     let git = GitClient::new(&executor, Path::new("/home/u/.cosmo"));
///     let tag = git.latest_tag().await.unwrap();
///     git.checkout(&tag).await.unwrap();
/// }
/// ```
pub struct GitClient<'a, E> {
    executor: &'a E,
    work_dir: &'a Path,
}

impl<'a, E: CommandExecutor> GitClient<'a, E> {
    /// Bind a client to `work_dir`.
    pub fn new(executor: &'a E, work_dir: &'a Path) -> Self {
        Self { executor, work_dir }
    }

    fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git")
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .current_dir(self.work_dir)
    }

    /// Run `git <args>` and return its trimmed stdout.
    pub async fn run<I, S>(&self, args: I, error_message: &str) -> Result<String, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.command(args);
        let result = self.executor.execute(&spec, Some(error_message)).await?;
        Ok(result.stdout.trim().to_string())
    }

    /// Clone `url` into the working directory itself.
    pub async fn clone_into(&self, url: &str) -> Result<(), CommandError> {
        self.run(
            ["clone", url, "."],
            "Failed to clone the repository (is git installed?)",
        )
        .await
        .map(drop)
    }

    /// Pull `branch` from `remote`, accepting unrelated histories.
    ///
    /// This covers a target directory that was populated independently of a
    /// clone.
    pub async fn pull_unrelated(&self, remote: &str, branch: &str) -> Result<(), CommandError> {
        self.run(
            ["pull", remote, branch, "--allow-unrelated-histories"],
            "Failed to pull from the repository (is git installed?)",
        )
        .await
        .map(drop)
    }

    /// Fetch every tag from the default remote.
    pub async fn fetch_tags(&self) -> Result<(), CommandError> {
        self.run(["fetch", "--tags"], "Failed to fetch release tags")
            .await
            .map(drop)
    }

    /// Name of the most recent tag reachable from `HEAD`.
    pub async fn latest_tag(&self) -> Result<String, CommandError> {
        const MESSAGE: &str = "Failed to get the latest release tag";
        let args = ["describe", "--tags", "--abbrev=0"];
        let tag = self.run(args, MESSAGE).await?;
        if tag.is_empty() {
            return Err(CommandError::empty_output(&self.command(args), Some(MESSAGE)));
        }
        Ok(tag)
    }

    /// Check out `reference` (a tag, branch or commit).
    pub async fn checkout(&self, reference: &str) -> Result<(), CommandError> {
        self.run(["checkout", reference], "Failed to checkout the latest release")
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::{Reply, ScriptedExecutor};

    #[tokio::test]
    async fn test_run_trims_output() {
        let executor = ScriptedExecutor::new().on("describe", Reply::Stdout("  v1.2.0\n\n"));
        let git = GitClient::new(&executor, Path::new("/tmp/cosmo"));
        assert_eq!(git.latest_tag().await.unwrap(), "v1.2.0");
        assert_eq!(executor.calls(), vec!["git describe --tags --abbrev=0"]);
    }

    #[tokio::test]
    async fn test_empty_describe_is_error() {
        let executor = ScriptedExecutor::new().on("describe", Reply::Stdout("\n"));
        let git = GitClient::new(&executor, Path::new("/tmp/cosmo"));
        let err = git.latest_tag().await.unwrap_err();
        assert!(matches!(err, CommandError::EmptyOutput { .. }));
        assert_eq!(err.to_string(), "Failed to get the latest release tag");
    }

    #[tokio::test]
    async fn test_commands() {
        let executor = ScriptedExecutor::new();
        let git = GitClient::new(&executor, Path::new("/tmp/cosmo"));

        git.clone_into("https://github.com/cosmo-lang/cosmo.git").await.unwrap();
        git.pull_unrelated("origin", "master").await.unwrap();
        git.fetch_tags().await.unwrap();
        git.checkout("v1.2.0").await.unwrap();

        assert_eq!(
            executor.calls(),
            vec![
                "git clone https://github.com/cosmo-lang/cosmo.git .",
                "git pull origin master --allow-unrelated-histories",
                "git fetch --tags",
                "git checkout v1.2.0",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_uses_operation_message() {
        let executor = ScriptedExecutor::new().on("clone", Reply::Exit(128));
        let git = GitClient::new(&executor, Path::new("/tmp/cosmo"));
        let err = git.clone_into("https://example.com/x.git").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to clone the repository (is git installed?)"
        );
        assert_eq!(err.exit_code(), Some(128));
    }

    #[tokio::test]
    async fn test_missing_git() {
        let executor = ScriptedExecutor::new().on("git", Reply::NotFound);
        let git = GitClient::new(&executor, Path::new("/tmp/cosmo"));
        let err = git.fetch_tags().await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Failed to fetch release tags");
    }
}
