//! WorkspaceManager builds rollback-safe lifecycle flows from jj primitives.

use super::marker::AgentMarker;
use super::{AGENTS_DIR, DEFAULT_WORKSPACE, GIT_SHIM, SHIM_DIR};
use crate::error::{DojoError, Result};
use crate::jj::{Client, ErrorKind, Workspace};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Derived state of the agent in a workspace. UI-only, recomputed on
/// every refresh, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Not an agent workspace (e.g. the default workspace)
    None,
    /// Agent workspace with no agent process running
    Idle,
    /// An agent process is currently running inside the workspace
    Running,
}

/// A workspace plus its derived agent state, as shown in the TUI list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceItem {
    pub workspace: Workspace,
    pub state: AgentState,
}

/// Check that a workspace name uses only the allowed character set.
pub fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(DojoError::InvalidName(name.to_string()))
    }
}

/// Manages agent workspaces under `<root>/.jj/agents/`.
///
/// All jj access goes through the [`Client`]; the manager never touches
/// jj internals directly. Creation is compensated: callers never observe
/// a half-created workspace as success.
#[derive(Debug)]
pub struct WorkspaceManager {
    client: Client,
    root: PathBuf,
}

impl WorkspaceManager {
    /// Create a manager for a known root workspace path.
    pub fn new(client: Client, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    /// Create a manager by resolving the root from the client's working
    /// directory.
    ///
    /// If the resolved workspace carries an agent marker, the marker's
    /// recorded root wins: jj would otherwise report the agent workspace
    /// itself as root. No marker means the current location is the root.
    pub fn discover(client: Client) -> Result<Self> {
        let jj_root = client.workspace_root()?;
        let root = match AgentMarker::load(&jj_root)? {
            Some(marker) => {
                debug!(
                    "inside agent workspace '{}', root is {}",
                    marker.name,
                    marker.root_workspace_path.display()
                );
                marker.root_workspace_path
            }
            None => jj_root,
        };
        Ok(Self::new(client, root))
    }

    /// The root workspace path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The jj client this manager operates through.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Directory holding all agent workspaces.
    pub fn agents_dir(&self) -> PathBuf {
        self.root.join(AGENTS_DIR)
    }

    /// Deterministic workspace path for a name. Pure function of
    /// `(root, name)`; independent callers agree on it without shared
    /// state.
    pub fn workspace_path(&self, name: &str) -> PathBuf {
        self.agents_dir().join(name)
    }

    /// Pid cache file for a workspace's agent process. Dotted so that
    /// [`WorkspaceManager::list`] skips it as bookkeeping.
    pub fn pid_cache_path(&self, name: &str) -> PathBuf {
        self.agents_dir().join(format!(".{name}.pid"))
    }

    /// Directory to run reads (diff, status) in for a workspace name.
    pub fn diff_dir(&self, name: &str) -> PathBuf {
        if name == DEFAULT_WORKSPACE {
            self.root.clone()
        } else {
            self.workspace_path(name)
        }
    }

    /// Create an agent workspace.
    ///
    /// Steps: validate name, ensure the agents directory is writable,
    /// `jj workspace add`, then provision the `.git` scope marker, the
    /// git shim, and the agent marker. Any post-add failure is
    /// compensated by forgetting the workspace and removing its
    /// directory before returning the original error.
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let path = self.workspace_path(name);
        let agents_dir = self.agents_dir();

        fs::create_dir_all(&agents_dir)
            .map_err(|_| DojoError::ParentNotWritable(agents_dir.clone()))?;
        let meta = fs::metadata(&agents_dir)?;
        if meta.permissions().readonly() {
            return Err(DojoError::ParentNotWritable(agents_dir));
        }

        // Duplicate names surface verbatim; nothing was created, so no
        // compensation is needed for any add failure.
        self.client.workspace_add(&path, Some("@"))?;

        if let Err(err) = self.provision(&path, name) {
            warn!("provisioning workspace '{name}' failed, rolling back: {err}");
            self.compensate(name, &path);
            return Err(err);
        }

        debug!("created workspace '{}' at {}", name, path.display());
        Ok(path)
    }

    /// Post-add provisioning: scope marker, git shim, agent marker.
    fn provision(&self, path: &Path, name: &str) -> Result<()> {
        // Empty .git file scopes git-aware tools to the workspace boundary.
        fs::write(path.join(".git"), b"")?;

        let shim_dir = path.join(SHIM_DIR);
        fs::create_dir_all(&shim_dir)?;
        let shim = shim_dir.join("git");
        fs::write(&shim, GIT_SHIM)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&shim, fs::Permissions::from_mode(0o755))?;
        }

        AgentMarker::new(&self.root, name).write(path)?;
        Ok(())
    }

    /// Best-effort rollback of a partially created workspace.
    fn compensate(&self, name: &str, path: &Path) {
        let _ = fs::remove_file(path.join(".git"));
        if let Err(err) = self.client.workspace_forget(name) {
            warn!("rollback: failed to forget workspace '{name}': {err}");
        }
        if let Err(err) = fs::remove_dir_all(path) {
            warn!("rollback: failed to remove {}: {err}", path.display());
        }
    }

    /// Tear down an agent workspace.
    ///
    /// Isolation markers go first (jj must see the directory as orphaned
    /// before forget), then the jj registration, then the directory tree
    /// unconditionally. Forgetting an unknown workspace counts as already
    /// clean, and removal failures are logged rather than raised, so
    /// cleanup is idempotent and maximally effective.
    pub fn cleanup(&self, name: &str) -> Result<()> {
        let path = self.workspace_path(name);

        let _ = fs::remove_file(path.join(".git"));
        AgentMarker::remove(&path);

        match self.client.workspace_forget(name) {
            Ok(()) => {}
            Err(err) if err.kind == ErrorKind::WorkspaceNotFound => {
                debug!("workspace '{name}' already forgotten");
            }
            Err(err) => {
                warn!("failed to forget workspace '{name}': {err}");
            }
        }

        // Directory removal is always an explicit step here; jj never
        // deletes it on forget.
        if path.exists()
            && let Err(err) = fs::remove_dir_all(&path)
        {
            warn!("failed to remove {}: {err}", path.display());
        }
        let _ = fs::remove_file(self.pid_cache_path(name));

        Ok(())
    }

    /// Names of agent workspace directories, sorted.
    ///
    /// Dotted entries are bookkeeping (pid caches) and are skipped. The
    /// result is cross-referenced against jj's own registry; drift in
    /// either direction is logged as a warning, never hidden and never
    /// fatal.
    pub fn list(&self) -> Result<Vec<String>> {
        let agents_dir = self.agents_dir();
        if !agents_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&agents_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type()?.is_dir() || name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();

        match self.client.workspace_list() {
            Ok(registered) => {
                for name in &names {
                    if !registered.iter().any(|w| &w.name == name) {
                        warn!("directory '{name}' has no registered jj workspace");
                    }
                }
                for ws in &registered {
                    if ws.name != DEFAULT_WORKSPACE && !names.contains(&ws.name) {
                        warn!("jj workspace '{}' has no directory under {}", ws.name, agents_dir.display());
                    }
                }
            }
            Err(err) => warn!("could not cross-check workspace registry: {err}"),
        }

        Ok(names)
    }

    /// All registered workspaces with derived agent state, default first.
    pub fn list_items(&self) -> Result<Vec<WorkspaceItem>> {
        let mut workspaces = self.client.workspace_list()?;
        workspaces.sort_by(|a, b| {
            let a_default = a.name == DEFAULT_WORKSPACE;
            let b_default = b.name == DEFAULT_WORKSPACE;
            b_default.cmp(&a_default).then_with(|| a.name.cmp(&b.name))
        });
        Ok(workspaces
            .into_iter()
            .map(|workspace| {
                let state = self.agent_state(&workspace.name);
                WorkspaceItem { workspace, state }
            })
            .collect())
    }

    /// Derive the agent state for a workspace name from on-disk
    /// bookkeeping.
    pub fn agent_state(&self, name: &str) -> AgentState {
        if name == DEFAULT_WORKSPACE {
            return AgentState::None;
        }
        if self.pid_cache_path(name).exists() {
            return AgentState::Running;
        }
        match AgentMarker::load(&self.workspace_path(name)) {
            Ok(Some(_)) => AgentState::Idle,
            _ => AgentState::None,
        }
    }
}
