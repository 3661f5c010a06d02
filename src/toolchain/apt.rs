//! Crystal installation through APT.

use crate::command::{CommandExecutor, CommandSpec};
use crate::install::{InstallError, InstallRun};
use crate::Platform;

/// Progress steps completed by [`install`].
pub(super) const STEPS: u8 = 5;

const BUILD_DEPENDENCIES: &[&str] = &[
    "curl",
    "libgc-dev",
    "libevent-dev",
    "libssl-dev",
    "libxml2-dev",
    "libyaml-dev",
    "zlib1g-dev",
];

const SIGNING_KEY_URL: &str = "https://keybase.io/crystal/pgp_keys.asc";
const APT_SOURCE: &str = "deb https://dist.crystal-lang.org/apt crystal main";
const APT_SOURCE_FILE: &str = "/etc/apt/sources.list.d/crystal.list";

/// Install native build dependencies, register the vendor repository and
/// install the `crystal` package.
pub(super) async fn install<E: CommandExecutor>(
    executor: &E,
    run: &mut InstallRun<'_>,
) -> Result<(), InstallError> {
    let work_dir = run.work_dir().to_path_buf();
    let shell = |script: String| CommandSpec::shell(Platform::Linux, script).current_dir(&work_dir);

    run.status("Installing build dependencies...");
    let deps = shell(format!(
        "sudo apt-get update && sudo apt-get install -y {}",
        BUILD_DEPENDENCIES.join(" ")
    ));
    executor
        .execute(&deps, Some("Failed to install dependencies"))
        .await?;
    run.advance();

    run.status("Adding Crystal signing key...");
    let key = shell(format!("curl -fsSL {} | sudo apt-key add -", SIGNING_KEY_URL));
    executor
        .execute(&key, Some("Failed to add key for Crystal's package manager"))
        .await?;
    run.advance();

    run.status("Adding Crystal APT repository...");
    let source = shell(format!(
        "echo \"{}\" | sudo tee {}",
        APT_SOURCE, APT_SOURCE_FILE
    ));
    executor
        .execute(&source, Some("Failed to add APT repository for Crystal"))
        .await?;
    run.advance();

    run.status("Refreshing package indexes...");
    let refresh = shell("sudo apt-get update".to_string());
    executor
        .execute(&refresh, Some("Failed to refresh package indexes"))
        .await?;
    run.advance();

    run.status("Installing Crystal via APT...");
    let crystal = shell("sudo apt-get install -y crystal".to_string());
    executor
        .execute(&crystal, Some("Failed to install Crystal"))
        .await?;
    run.advance();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::{Reply, ScriptedExecutor};
    use crate::install::InstallEvent;
    use std::sync::Mutex;

    fn progress(events: &[InstallEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                InstallEvent::Progress { percent } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_install_sequence_advances_each_step() {
        let executor = ScriptedExecutor::new();
        let events = Mutex::new(Vec::new());
        let sink = |e: InstallEvent| events.lock().unwrap().push(e);
        let mut run = InstallRun::new("/tmp/cosmo", &sink);

        install(&executor, &mut run).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls[0].contains("apt-get install -y curl libgc-dev"));
        assert!(calls[1].contains("apt-key add"));
        assert!(calls[2].contains(APT_SOURCE));
        assert!(calls[2].contains(APT_SOURCE_FILE));
        assert!(calls[3].ends_with("\"sudo apt-get update\""));
        assert!(calls[4].contains("apt-get install -y crystal"));
        assert!(calls.iter().all(|c| c.starts_with("sh -c ")));

        assert_eq!(run.steps(), STEPS);
        assert_eq!(progress(&events.lock().unwrap()).len(), STEPS as usize);
    }

    #[tokio::test]
    async fn test_failure_stops_sequence() {
        let executor = ScriptedExecutor::new().on("apt-key", Reply::Exit(2));
        let sink = |_e: InstallEvent| {};
        let mut run = InstallRun::new("/tmp/cosmo", &sink);

        let err = install(&executor, &mut run).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to add key for Crystal's package manager"
        );
        assert_eq!(executor.calls().len(), 2);
        assert_eq!(run.steps(), 1);
    }
}
