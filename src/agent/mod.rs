//! Agent process launcher.
//!
//! Launches the agent command inside a workspace with stdin/stdout/stderr
//! inherited from the controlling terminal. The workspace's shim
//! directory is prepended to PATH so that `git` resolves to the disabled
//! shim instead of the real binary. A pid cache file next to the
//! workspace records that an agent is running; the TUI derives
//! [`crate::workspace::AgentState`] from it.

use crate::config::AgentConfig;
use crate::error::{DojoError, Result};
use crate::workspace::SHIM_DIR;
use log::{info, warn};
use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Build the PATH value with the workspace's shim directory in front.
fn shimmed_path(workspace_path: &Path) -> OsString {
    let shim_dir = workspace_path.join(SHIM_DIR);
    let mut entries = vec![shim_dir];
    if let Some(existing) = env::var_os("PATH") {
        entries.extend(env::split_paths(&existing));
    }
    env::join_paths(entries).unwrap_or_else(|_| {
        // A PATH entry containing ':' cannot be joined; fall back to the
        // ambient PATH rather than refusing to launch.
        env::var_os("PATH").unwrap_or_default()
    })
}

/// Run the agent to completion inside `workspace_path`.
///
/// The exit status is reported to the caller but a non-zero exit never
/// aborts cleanup. The pid cache at `pid_cache` exists exactly while the
/// agent runs.
pub fn run(config: &AgentConfig, workspace_path: &Path, pid_cache: &Path) -> Result<ExitStatus> {
    let mut command = Command::new(&config.command);
    command
        .args(&config.args)
        .current_dir(workspace_path)
        .env("PATH", shimmed_path(workspace_path))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    info!(
        "launching agent '{}' in {}",
        config.command,
        workspace_path.display()
    );

    let mut child = command
        .spawn()
        .map_err(|e| DojoError::Agent(format!("failed to launch '{}': {e}", config.command)))?;

    if let Err(err) = std::fs::write(pid_cache, child.id().to_string()) {
        warn!("could not write pid cache {}: {err}", pid_cache.display());
    }

    let status = child.wait();
    let _ = std::fs::remove_file(pid_cache);

    let status =
        status.map_err(|e| DojoError::Agent(format!("failed waiting for agent: {e}")))?;
    info!("agent exited with {status}");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_shimmed_path_prepends_shim_dir() {
        let temp = TempDir::new().unwrap();
        let path = shimmed_path(temp.path());
        let first = env::split_paths(&path).next().unwrap();
        assert_eq!(first, temp.path().join(SHIM_DIR));
    }

    #[test]
    fn test_run_reports_exit_status_and_clears_pid_cache() {
        let temp = TempDir::new().unwrap();
        let pid_cache = temp.path().join(".agent.pid");
        let config = AgentConfig {
            command: "true".to_string(),
            args: Vec::new(),
        };

        let status = run(&config, temp.path(), &pid_cache).unwrap();
        assert!(status.success());
        assert!(!pid_cache.exists());
    }

    #[test]
    fn test_run_nonzero_exit_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let pid_cache = temp.path().join(".agent.pid");
        let config = AgentConfig {
            command: "false".to_string(),
            args: Vec::new(),
        };

        let status = run(&config, temp.path(), &pid_cache).unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_run_missing_command_is_agent_error() {
        let temp = TempDir::new().unwrap();
        let pid_cache = temp.path().join(".agent.pid");
        let config = AgentConfig {
            command: "/nonexistent/agent-binary".to_string(),
            args: Vec::new(),
        };

        let err = run(&config, temp.path(), &pid_cache).unwrap_err();
        assert!(matches!(err, DojoError::Agent(_)));
        assert!(!pid_cache.exists());
    }
}
