//! End-to-end workspace lifecycle tests against a real jj repository.
//!
//! These tests drive the actual jj binary in a fresh temporary repo.
//! They skip (with a note on stderr) when jj is not installed, so the
//! rest of the suite stays runnable anywhere.

use dojo::jj::{Client, DiffOptions};
use dojo::workspace::{AgentMarker, DEFAULT_WORKSPACE, WorkspaceManager};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// True if a usable jj binary is on PATH.
fn jj_available() -> bool {
    Command::new("jj")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

macro_rules! require_jj {
    () => {
        if !jj_available() {
            eprintln!("skipping: jj not installed");
            return;
        }
    };
}

/// Create a jj repo in a temp dir and return a manager rooted there.
fn setup_repo() -> (TempDir, WorkspaceManager) {
    let temp = TempDir::new().unwrap();
    let status = Command::new("jj")
        .args(["git", "init"])
        .current_dir(temp.path())
        .status()
        .unwrap();
    assert!(status.success(), "jj git init failed");

    let client = Client::new(temp.path());
    let manager = WorkspaceManager::new(client, temp.path());
    (temp, manager)
}

fn workspace_names(manager: &WorkspaceManager) -> Vec<String> {
    manager
        .client()
        .workspace_list()
        .unwrap()
        .into_iter()
        .map(|w| w.name)
        .collect()
}

#[test]
fn test_create_registers_and_provisions_workspace() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    assert!(path.ends_with(".jj/agents/alpha"));
    assert!(path.is_dir());

    // Registered exactly once.
    let names = workspace_names(&manager);
    assert_eq!(names.iter().filter(|n| *n == "alpha").count(), 1);

    // Isolation provisioning: scope marker, shim, agent marker.
    assert!(path.join(".git").is_file());
    assert!(path.join(".jj/.dojo-bin/git").is_file());
    let marker = AgentMarker::load(&path).unwrap().unwrap();
    assert_eq!(marker.name, "alpha");
    assert_eq!(marker.root_workspace_path, manager.root());
}

#[test]
fn test_duplicate_create_fails_and_leaves_original_untouched() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    fs::write(path.join("work.txt"), b"in progress").unwrap();

    let err = manager.create("alpha").unwrap_err();
    assert!(err.is_workspace_exists(), "unexpected error: {err}");

    // The original workspace and its contents survive.
    assert_eq!(fs::read(path.join("work.txt")).unwrap(), b"in progress");
    assert_eq!(workspace_names(&manager).iter().filter(|n| *n == "alpha").count(), 1);
}

#[test]
fn test_cleanup_is_idempotent() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    manager.cleanup("alpha").unwrap();
    assert!(!path.exists());
    assert!(!workspace_names(&manager).contains(&"alpha".to_string()));

    // Second cleanup of the same name must also succeed.
    manager.cleanup("alpha").unwrap();
}

#[test]
fn test_root_resolution_from_inside_agent_workspace() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();

    // A manager discovered from inside the agent workspace resolves the
    // same root via the marker, not the workspace itself.
    let inner = WorkspaceManager::discover(Client::new(&path)).unwrap();
    assert_eq!(
        fs::canonicalize(inner.root()).unwrap(),
        fs::canonicalize(manager.root()).unwrap()
    );
}

#[test]
fn test_stale_read_recovers_automatically() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();

    // Move the repository forward from the default workspace; the agent
    // workspace's working copy is now stale.
    fs::write(manager.root().join("file.txt"), b"v1").unwrap();
    let client = manager.client();
    client.run(&["commit", "-m", "advance"]).unwrap();

    // A read in the stale workspace must succeed via refresh-and-retry.
    let opts = DiffOptions {
        revision: None,
        dir: Some(path.clone()),
        color: false,
    };
    client.diff(&opts).unwrap();
    client.status(&path).unwrap();
}

#[test]
fn test_diff_reflects_workspace_edits() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    fs::write(path.join("hello.txt"), b"hello from alpha\n").unwrap();

    let opts = DiffOptions {
        revision: None,
        dir: Some(path),
        color: false,
    };
    let diff = manager.client().diff(&opts).unwrap();
    assert!(diff.contains("hello.txt"), "diff was: {diff}");
}

/// The one-shot listing is agent workspaces only; `default` belongs to
/// the repository, not to an agent, and never appears in it.
#[test]
fn test_agent_list_excludes_default() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    manager.create("alpha").unwrap();

    let names = manager.list().unwrap();
    assert_eq!(names, vec!["alpha".to_string()]);
    assert!(!names.contains(&DEFAULT_WORKSPACE.to_string()));

    // The TUI view is the full registry and does include default.
    let items = manager.list_items().unwrap();
    assert!(items.iter().any(|i| i.workspace.name == DEFAULT_WORKSPACE));
}

#[test]
fn test_list_items_defaults_first() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    manager.create("bravo").unwrap();
    manager.create("alpha").unwrap();

    let items = manager.list_items().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.workspace.name.as_str()).collect();
    assert_eq!(names, vec![DEFAULT_WORKSPACE, "alpha", "bravo"]);
}

#[test]
fn test_full_agent_scenario() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    // Create, work, inspect, clean up.
    let path = manager.create("agent-1").unwrap();
    fs::write(path.join("src.rs"), b"fn main() {}\n").unwrap();

    let names = manager.list().unwrap();
    assert_eq!(names, vec!["agent-1".to_string()]);

    let status = manager.client().status(&path).unwrap();
    assert!(!status.changes.is_empty());

    manager.cleanup("agent-1").unwrap();
    assert!(manager.list().unwrap().is_empty());
    assert!(!path.exists());
}

#[test]
fn test_revision_operations() {
    require_jj!();
    let (_temp, manager) = setup_repo();
    let client = manager.client();
    let root = manager.root().to_path_buf();

    client.describe("work in progress").unwrap();
    let commits = client.log(Some(&dojo::jj::LogOptions { limit: Some(5) })).unwrap();
    assert!(commits.iter().any(|c| c.description == "work in progress"));

    let before = client.working_copy_change_id(&root).unwrap();
    client.new_revision().unwrap();
    let after = client.working_copy_change_id(&root).unwrap();
    assert_ne!(before, after);
    assert_eq!(client.parent_change_id(&root).unwrap(), before);

    // Squash the empty child back into its parent.
    fs::write(root.join("squash-me.txt"), b"x").unwrap();
    client.squash().unwrap();
    assert!(!client.working_copy_change_id(&root).unwrap().is_empty());

    // Branch two children off a named base, move one onto the other,
    // then fold it in.
    client.describe_revision("@", "base").unwrap();
    let base = client.working_copy_change_id(&root).unwrap();

    client.new_from(&base).unwrap();
    fs::write(root.join("left.txt"), b"l").unwrap();
    client.describe("left").unwrap();
    let left = client.working_copy_change_id(&root).unwrap();

    client.new_from_in(&root, &base).unwrap();
    fs::write(root.join("right.txt"), b"r").unwrap();
    client.describe("right").unwrap();

    client.rebase(&left).unwrap();
    assert_eq!(client.parent_change_id(&root).unwrap(), left);

    client.squash_into("@", &left).unwrap();
    let commits = client.log(None).unwrap();
    assert!(commits.iter().any(|c| c.description == "left"));

    client.new_revision_in(&root).unwrap();
    assert_ne!(client.working_copy_change_id(&root).unwrap(), left);
}

/// Cleanup after a manual forget must still remove the directory.
#[test]
fn test_cleanup_after_external_forget() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    manager.client().workspace_forget("alpha").unwrap();
    assert!(path.exists());

    manager.cleanup("alpha").unwrap();
    assert!(!path.exists());
}

/// The shim directory must contain a rejecting git executable.
#[test]
fn test_git_shim_blocks_git() {
    require_jj!();
    let (_temp, manager) = setup_repo();

    let path = manager.create("alpha").unwrap();
    let shim = path.join(".jj/.dojo-bin/git");
    let content = fs::read_to_string(&shim).unwrap();
    assert!(content.starts_with("#!/bin/sh"));
    assert!(content.contains("exit 1"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&shim).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111, "shim is not executable");

        let out = Command::new(&shim).arg("status").output().unwrap();
        assert!(!out.status.success());
    }
}
