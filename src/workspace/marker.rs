//! Agent marker files.
//!
//! Each agent workspace carries a small JSON record pointing back at the
//! root workspace it was spawned from. Root resolution reads it so that a
//! command run from inside an agent workspace still finds the real root
//! (jj itself would report the agent workspace as root).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the marker inside a workspace.
pub const MARKER_FILE: &str = ".dojo-agent.json";

/// Provenance record written into every agent workspace at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMarker {
    /// Path of the root workspace this agent workspace derives from
    pub root_workspace_path: PathBuf,
    /// Workspace name
    pub name: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl AgentMarker {
    /// Build a marker for a freshly created workspace.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root_workspace_path: root.into(),
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Write the marker into `workspace_path`.
    pub fn write(&self, workspace_path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(workspace_path.join(MARKER_FILE), data)?;
        Ok(())
    }

    /// Read the marker from `workspace_path`, if one exists.
    ///
    /// A missing file is `Ok(None)`; a present-but-unreadable marker is an
    /// error, since it means a half-broken workspace.
    pub fn load(workspace_path: &Path) -> Result<Option<AgentMarker>> {
        let path = workspace_path.join(MARKER_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)?;
        let marker = serde_json::from_slice(&data)?;
        Ok(Some(marker))
    }

    /// Remove the marker from `workspace_path`, ignoring a missing file.
    pub fn remove(workspace_path: &Path) {
        let _ = fs::remove_file(workspace_path.join(MARKER_FILE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_round_trip() {
        let temp = TempDir::new().unwrap();
        let marker = AgentMarker::new("/repo/root", "agent-1");
        marker.write(temp.path()).unwrap();

        let loaded = AgentMarker::load(temp.path()).unwrap().unwrap();
        assert_eq!(loaded, marker);
        assert_eq!(loaded.root_workspace_path, PathBuf::from("/repo/root"));
        assert_eq!(loaded.name, "agent-1");
    }

    #[test]
    fn test_marker_created_at_is_rfc3339() {
        let marker = AgentMarker::new("/repo", "a");
        assert!(chrono::DateTime::parse_from_rfc3339(&marker.created_at).is_ok());
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(AgentMarker::load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MARKER_FILE), "not json").unwrap();
        assert!(AgentMarker::load(temp.path()).is_err());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        AgentMarker::remove(temp.path());
        AgentMarker::new("/repo", "a").write(temp.path()).unwrap();
        AgentMarker::remove(temp.path());
        assert!(AgentMarker::load(temp.path()).unwrap().is_none());
        AgentMarker::remove(temp.path());
    }
}
