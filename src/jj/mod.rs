//! Client for the `jj` command-line tool.
//!
//! Every operation spawns `jj` as a subprocess with an explicit working
//! directory, captures stdout/stderr separately, and waits for exit.
//! Failures are classified by matching known substrings in stderr; the raw
//! stderr text is always preserved for display.

mod diff;
mod ops;

pub use diff::DiffOptions;

use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// What a failed jj invocation means, derived from its stderr output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The working directory is not inside a jj repository
    NotRepo,
    /// `jj workspace add` target already exists
    WorkspaceExists,
    /// The named workspace is not registered
    WorkspaceNotFound,
    /// The workspace's working copy is stale and needs `workspace update-stale`
    StaleWorkingCopy,
    /// Anything we could not classify
    Other,
}

/// Substring -> kind table used to classify stderr output.
///
/// jj does not version its error text, so these matches are best-effort
/// and may need updating for future jj releases. Matching is
/// case-insensitive `contains`.
const CLASSIFICATION: &[(&str, ErrorKind)] = &[
    ("not a jj repo", ErrorKind::NotRepo),
    ("there is no jj repo", ErrorKind::NotRepo),
    ("already exists", ErrorKind::WorkspaceExists),
    ("no such workspace", ErrorKind::WorkspaceNotFound),
    ("working copy is stale", ErrorKind::StaleWorkingCopy),
];

/// Classify stderr text against the known-substring table.
pub fn classify(stderr: &str) -> ErrorKind {
    let lowered = stderr.to_lowercase();
    for (needle, kind) in CLASSIFICATION {
        if lowered.contains(needle) {
            return *kind;
        }
    }
    ErrorKind::Other
}

/// A failed jj invocation.
///
/// Carries the subcommand that was run, the raw stderr text, the derived
/// [`ErrorKind`], the exit code if the process ran, and the spawn error if
/// it did not.
#[derive(Debug, Error)]
#[error("jj {cmd}: {stderr}")]
pub struct CommandError {
    /// The jj arguments that were run, joined with spaces
    pub cmd: String,
    /// Raw stderr output (or the spawn failure text)
    pub stderr: String,
    /// Classification derived from stderr
    pub kind: ErrorKind,
    /// Exit code, if the process ran to completion
    pub exit_code: Option<i32>,
    /// Underlying spawn failure, if the process never ran
    #[source]
    pub source: Option<std::io::Error>,
}

impl CommandError {
    /// Build an error from a non-zero exit, classifying stderr.
    pub fn new(cmd: impl Into<String>, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        let stderr = stderr.into();
        let kind = classify(&stderr);
        Self {
            cmd: cmd.into(),
            stderr,
            kind,
            exit_code,
            source: None,
        }
    }

    /// Build an error for a process that could not be spawned at all.
    pub fn spawn(cmd: impl Into<String>, err: std::io::Error) -> Self {
        Self {
            cmd: cmd.into(),
            stderr: format!("failed to run jj: {err}"),
            kind: ErrorKind::Other,
            exit_code: None,
            source: Some(err),
        }
    }
}

/// A jj workspace as reported by `jj workspace list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace name, unique within the repository
    pub name: String,
    /// Short change ID of the workspace's working copy, if reported
    pub change_id: Option<String>,
}

/// One changed file in `jj st` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Single-letter status (M, A, D, R, C)
    pub status: char,
    /// Repo-relative path
    pub path: String,
}

/// Parsed `jj st` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Changed files in the working copy
    pub changes: Vec<Change>,
    /// Whether jj reported unresolved conflicts
    pub has_conflicts: bool,
}

/// One commit from `jj log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Short change ID
    pub change_id: String,
    /// First line of the description (may be empty)
    pub description: String,
}

/// Options for `jj log`.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Maximum number of entries to return
    pub limit: Option<usize>,
}

/// Synchronous client for the jj binary.
///
/// Holds no state beyond the executable path and the working directory
/// used for calls that do not name a directory explicitly.
#[derive(Debug, Clone)]
pub struct Client {
    jj_bin: String,
    work_dir: PathBuf,
}

impl Client {
    /// Create a client rooted at `work_dir`, using `jj` from PATH.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            jj_bin: "jj".to_string(),
            work_dir: work_dir.into(),
        }
    }

    /// Override the jj executable path.
    pub fn with_jj_bin(mut self, jj_bin: impl Into<String>) -> Self {
        self.jj_bin = jj_bin.into();
        self
    }

    /// The jj executable this client invokes.
    pub fn jj_bin(&self) -> &str {
        &self.jj_bin
    }

    /// The default working directory for this client.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run jj with the given arguments in the client's working directory.
    ///
    /// Returns trimmed stdout on success.
    pub fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        self.run_in(&self.work_dir, args)
    }

    /// Run jj with the given arguments in an explicit directory.
    pub fn run_in(&self, dir: &Path, args: &[&str]) -> Result<String, CommandError> {
        let cmd = args.join(" ");
        debug!("running jj {} in {}", cmd, dir.display());

        let output = Command::new(&self.jj_bin)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| CommandError::spawn(cmd.clone(), e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(CommandError::new(cmd, stderr, output.status.code()))
        }
    }

    /// List all workspaces registered in the repository.
    pub fn workspace_list(&self) -> Result<Vec<Workspace>, CommandError> {
        let stdout = self.run(&["workspace", "list"])?;
        Ok(parse_workspace_list(&stdout))
    }

    /// Add a workspace at `path`, optionally based on a revision.
    pub fn workspace_add(&self, path: &Path, revision: Option<&str>) -> Result<(), CommandError> {
        let path_str = path.to_string_lossy();
        let mut args = vec!["workspace", "add", path_str.as_ref()];
        if let Some(rev) = revision {
            args.push("-r");
            args.push(rev);
        }
        self.run(&args)?;
        Ok(())
    }

    /// Forget a workspace by name. Does NOT remove its directory.
    pub fn workspace_forget(&self, name: &str) -> Result<(), CommandError> {
        self.run(&["workspace", "forget", name])?;
        Ok(())
    }

    /// Resolve the root directory of the current workspace.
    pub fn workspace_root(&self) -> Result<PathBuf, CommandError> {
        let stdout = self.run(&["workspace", "root"])?;
        Ok(PathBuf::from(stdout))
    }

    /// Update a stale working copy to match the repository view.
    pub fn workspace_update_stale(&self, dir: &Path) -> Result<(), CommandError> {
        self.run_in(dir, &["workspace", "update-stale"])?;
        Ok(())
    }

    /// Commit log, newest first.
    pub fn log(&self, opts: Option<&LogOptions>) -> Result<Vec<Commit>, CommandError> {
        let template = r#"change_id.short() ++ "\t" ++ description.first_line() ++ "\n""#;
        let mut args = vec!["log", "--no-graph", "-T", template];
        let limit;
        if let Some(n) = opts.and_then(|o| o.limit) {
            limit = n.to_string();
            args.push("--limit");
            args.push(&limit);
        }
        let stdout = self.run(&args)?;
        Ok(parse_log(&stdout))
    }

    /// Short change ID of the working copy in `dir`.
    pub fn working_copy_change_id(&self, dir: &Path) -> Result<String, CommandError> {
        self.run_in(dir, &["log", "-r", "@", "--no-graph", "-T", "change_id.short()"])
    }

    /// Short change ID of the working copy's parent in `dir`.
    pub fn parent_change_id(&self, dir: &Path) -> Result<String, CommandError> {
        self.run_in(dir, &["log", "-r", "@-", "--no-graph", "-T", "change_id.short()"])
    }
}

/// Parse `jj workspace list` output.
///
/// Each line looks like `name: changeid commitid description`. Unknown
/// lines and trailing blanks are ignored rather than causing failure.
fn parse_workspace_list(stdout: &str) -> Vec<Workspace> {
    let mut workspaces = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            continue;
        }
        let change_id = rest.split_whitespace().next().map(str::to_string);
        workspaces.push(Workspace {
            name: name.to_string(),
            change_id,
        });
    }
    workspaces
}

/// Parse `jj st` output into a [`Status`].
fn parse_status(stdout: &str) -> Status {
    let mut status = Status::default();
    for line in stdout.lines() {
        let line = line.trim_end();
        if line.to_lowercase().contains("conflict") {
            status.has_conflicts = true;
        }
        let mut chars = line.chars();
        let (Some(flag), Some(' ')) = (chars.next(), chars.next()) else {
            continue;
        };
        if !matches!(flag, 'M' | 'A' | 'D' | 'R' | 'C') {
            continue;
        }
        let path = chars.as_str().trim();
        if path.is_empty() {
            continue;
        }
        status.changes.push(Change {
            status: flag,
            path: path.to_string(),
        });
    }
    status
}

/// Parse the tab-separated log template output.
fn parse_log(stdout: &str) -> Vec<Commit> {
    let mut commits = Vec::new();
    for line in stdout.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let (change_id, description) = match line.split_once('\t') {
            Some((id, desc)) => (id, desc),
            None => (line, ""),
        };
        if change_id.is_empty() {
            continue;
        }
        commits.push(Commit {
            change_id: change_id.to_string(),
            description: description.to_string(),
        });
    }
    commits
}
