//! Error types for Dojo
//!
//! Centralized error handling using thiserror. Failures from the jj
//! subprocess keep their own `CommandError` type (with classification);
//! everything above the client layer uses `DojoError`.

use crate::jj::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// All error types that can occur in Dojo
#[derive(Debug, Error)]
pub enum DojoError {
    /// Workspace name contains characters outside the allowed set
    #[error("invalid workspace name {0:?}: only letters, digits, '-' and '_' are allowed")]
    InvalidName(String),

    /// The directory that should hold agent workspaces cannot be written
    #[error("agents directory is not writable: {0}")]
    ParentNotWritable(PathBuf),

    /// A jj invocation failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Failure launching or waiting on the agent process
    #[error("agent error: {0}")]
    Agent(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (marker files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Dojo operations
pub type Result<T> = std::result::Result<T, DojoError>;

impl DojoError {
    /// True if the underlying failure was a duplicate `jj workspace add`.
    pub fn is_workspace_exists(&self) -> bool {
        matches!(
            self,
            DojoError::Command(cmd) if cmd.kind == crate::jj::ErrorKind::WorkspaceExists
        )
    }

    /// True if the underlying failure means we are not inside a jj repository.
    pub fn is_not_repo(&self) -> bool {
        matches!(
            self,
            DojoError::Command(cmd) if cmd.kind == crate::jj::ErrorKind::NotRepo
        )
    }
}
