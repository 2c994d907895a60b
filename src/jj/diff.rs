//! Diff and status reads with stale-workspace recovery.
//!
//! A workspace goes stale when another workspace moves the repository
//! forward. Staleness is resolved deterministically by
//! `jj workspace update-stale`, so reads retry exactly once after a
//! refresh; any other failure, or a failed refresh, propagates the
//! original error unmodified.

use super::{Client, CommandError, ErrorKind, Status};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Options for `jj diff`.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Revision to diff (defaults to the working copy)
    pub revision: Option<String>,
    /// Directory to run in (for non-default workspaces)
    pub dir: Option<PathBuf>,
    /// Emit ANSI color codes
    pub color: bool,
}

fn build_diff_args(opts: &DiffOptions) -> Vec<String> {
    let mut args = vec!["diff".to_string()];
    args.push(if opts.color { "--color=always".into() } else { "--color=never".into() });
    if let Some(rev) = &opts.revision {
        args.push("-r".into());
        args.push(rev.clone());
    }
    args
}

impl Client {
    /// Raw diff output for a workspace.
    ///
    /// Recovers automatically from a stale working copy (one refresh, one
    /// retry).
    pub fn diff(&self, opts: &DiffOptions) -> Result<String, CommandError> {
        let args = build_diff_args(opts);
        let dir = opts.dir.clone().unwrap_or_else(|| self.work_dir().to_path_buf());
        self.read_with_stale_retry(&dir, &args)
    }

    /// Working copy status for a directory, with the same stale recovery
    /// as [`Client::diff`].
    pub fn status(&self, dir: &Path) -> Result<Status, CommandError> {
        let stdout = self.read_with_stale_retry(dir, &["st".to_string()])?;
        Ok(super::parse_status(&stdout))
    }

    /// Run a read command, refreshing the workspace and retrying once if
    /// the working copy is stale.
    fn read_with_stale_retry(&self, dir: &Path, args: &[String]) -> Result<String, CommandError> {
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        match self.run_in(dir, &arg_refs) {
            Err(err) if err.kind == ErrorKind::StaleWorkingCopy => {
                debug!("stale working copy in {}, refreshing", dir.display());
                match self.workspace_update_stale(dir) {
                    Ok(()) => self.run_in(dir, &arg_refs),
                    Err(refresh_err) => {
                        // Refresh failed: surface the original stale error,
                        // not the refresh failure.
                        warn!("workspace update-stale failed: {refresh_err}");
                        Err(err)
                    }
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_diff_args_default() {
        let args = build_diff_args(&DiffOptions::default());
        assert_eq!(args, vec!["diff", "--color=never"]);
    }

    #[test]
    fn test_build_diff_args_color_and_revision() {
        let opts = DiffOptions {
            revision: Some("@-".to_string()),
            dir: None,
            color: true,
        };
        let args = build_diff_args(&opts);
        assert_eq!(args, vec!["diff", "--color=always", "-r", "@-"]);
    }

    #[test]
    fn test_non_stale_error_is_not_retried() {
        // Point the client at a binary that cannot exist: the failure
        // classifies as Other, so no refresh is attempted and the error
        // propagates unchanged.
        let client = Client::new("/tmp").with_jj_bin("/nonexistent/jj-binary");
        let err = client.diff(&DiffOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Other);
    }
}
