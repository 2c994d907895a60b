//! Messages and actions for the TUI state machine.
//!
//! All async work resolves to exactly one [`Msg`] delivered back into the
//! sequential update loop; the update loop emits [`Action`]s that the
//! runner dispatches. State is only ever mutated while applying one
//! message or key event at a time.

use crate::error::DojoError;
use crate::workspace::WorkspaceItem;

/// Completion messages fed back into the update loop.
#[derive(Debug)]
pub enum Msg {
    /// Workspace list load finished
    WorkspacesLoaded(Result<Vec<WorkspaceItem>, DojoError>),
    /// Async workspace creation finished
    WorkspaceAdded {
        name: String,
        result: Result<(), DojoError>,
    },
    /// Async workspace deletion finished
    WorkspaceDeleted {
        name: String,
        result: Result<(), DojoError>,
    },
    /// Diff load finished for a workspace
    DiffLoaded {
        workspace: String,
        result: Result<String, DojoError>,
    },
}

/// Work requested by the update loop.
///
/// Async variants are dispatched off the update path and come back as a
/// [`Msg`]; `ConfirmDelete` is absorbed by the app itself (it only
/// raises the overlay).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reload the workspace list
    LoadWorkspaces,
    /// Load the diff for a workspace
    LoadDiff { workspace: String },
    /// Create a workspace (already validated against the visible list)
    CreateWorkspace { name: String },
    /// Delete a workspace (already confirmed)
    DeleteWorkspace { name: String },
    /// Raise the confirmation overlay for a delete
    ConfirmDelete { name: String },
}
