//! Workspace lifecycle management.
//!
//! Agent workspaces live under `.jj/agents/` in the root workspace. The
//! manager builds multi-step create/cleanup flows from [`crate::jj::Client`]
//! primitives and owns all marker-file bookkeeping.

mod manager;
mod marker;

pub use manager::{AgentState, WorkspaceItem, WorkspaceManager, validate_name};
pub use marker::{AgentMarker, MARKER_FILE};

/// Directory under the root workspace that holds agent workspaces.
pub const AGENTS_DIR: &str = ".jj/agents";

/// Directory inside an agent workspace that holds the git shim.
pub const SHIM_DIR: &str = ".jj/.dojo-bin";

/// Shell script installed as `git` ahead of the real one on PATH.
pub const GIT_SHIM: &str = "#!/bin/sh\necho \"git disabled for agents; use jj\" >&2\nexit 1\n";

/// The workspace jj creates at repo init; never deletable through dojo.
pub const DEFAULT_WORKSPACE: &str = "default";
