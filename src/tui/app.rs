//! Application state machine.
//!
//! The app owns both panes and the confirmation overlay, routes key
//! events (overlay first, then name entry, then global keys, then the
//! focused pane) and fans completion messages out to every pane. All
//! mutation happens here, one key event or message at a time.

use super::confirm::{ConfirmAction, ConfirmDialog};
use super::diff::DiffPane;
use super::list::WorkspaceListPane;
use super::msg::{Action, Msg};
use super::pane::Pane;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    WorkspaceList,
    DiffView,
}

pub struct App {
    pub list: WorkspaceListPane,
    pub diff: DiffPane,
    pub confirm: ConfirmDialog,
    pub focus: Focus,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            list: WorkspaceListPane::new(),
            diff: DiffPane::new(),
            confirm: ConfirmDialog::new(),
            focus: Focus::WorkspaceList,
            should_quit: false,
        }
    }

    /// Actions to dispatch on startup.
    pub fn init(&mut self) -> Vec<Action> {
        let mut actions = self.list.init();
        actions.extend(self.diff.init());
        actions
    }

    /// Route a key event, returning the actions to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // The overlay eats everything while visible.
        if self.confirm.visible() {
            if let Some(outcome) = self.confirm.handle_key(key)
                && outcome.confirmed
            {
                let ConfirmAction::DeleteWorkspace(name) = outcome.action;
                return vec![Action::DeleteWorkspace { name }];
            }
            return Vec::new();
        }

        // Name entry captures printable keys, so global bindings are
        // suspended while it is active (except ctrl-c).
        if self.list.in_name_entry() {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.should_quit = true;
                return Vec::new();
            }
            let events = self.list.handle_key(key);
            return self.absorb(events);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::WorkspaceList => Focus::DiffView,
                    Focus::DiffView => Focus::WorkspaceList,
                };
                return Vec::new();
            }
            KeyCode::Char('r') => {
                return self.refresh();
            }
            _ => {}
        }

        let actions = match self.focus {
            Focus::WorkspaceList => self.list.handle_key(key),
            Focus::DiffView => self.diff.handle_key(key),
        };
        let mut actions = self.absorb(actions);
        actions.extend(self.sync_selection());
        actions
    }

    /// Fold a completion message into every pane.
    pub fn apply(&mut self, msg: &Msg) -> Vec<Action> {
        let mut actions = self.list.update(msg);
        actions.extend(self.diff.update(msg));
        let mut actions = self.absorb(actions);
        actions.extend(self.sync_selection());
        actions
    }

    /// Reload both the list and the current diff.
    pub fn refresh(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::LoadWorkspaces];
        if let Some(name) = self.list.selected_name() {
            let name = name.to_string();
            self.diff.begin_load(&name);
            actions.push(Action::LoadDiff { workspace: name });
        }
        actions
    }

    /// Intercept actions the app resolves itself: `ConfirmDelete` raises
    /// the overlay, and `LoadDiff` marks the diff pane loading so a
    /// stale in-flight result cannot land after it.
    fn absorb(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::ConfirmDelete { name } => {
                    self.confirm.show(
                        format!("Delete workspace '{name}'?"),
                        ConfirmAction::DeleteWorkspace(name),
                    );
                }
                Action::LoadDiff { workspace } => {
                    self.diff.begin_load(&workspace);
                    out.push(Action::LoadDiff { workspace });
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Keep the diff pane pointed at the selected workspace; emits a
    /// load when the selection moved.
    fn sync_selection(&mut self) -> Vec<Action> {
        let Some(selected) = self.list.selected_name() else {
            return Vec::new();
        };
        if self.diff.for_workspace() == Some(selected) {
            return Vec::new();
        }
        let selected = selected.to_string();
        self.diff.begin_load(&selected);
        vec![Action::LoadDiff { workspace: selected }]
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jj::Workspace;
    use crate::workspace::{AgentState, WorkspaceItem};

    fn items(names: &[&str]) -> Vec<WorkspaceItem> {
        names
            .iter()
            .map(|name| WorkspaceItem {
                workspace: Workspace {
                    name: name.to_string(),
                    change_id: None,
                },
                state: AgentState::None,
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app(names: &[&str]) -> App {
        let mut app = App::new();
        app.apply(&Msg::WorkspacesLoaded(Ok(items(names))));
        app
    }

    #[test]
    fn test_init_loads_workspaces() {
        let mut app = App::new();
        assert_eq!(app.init(), vec![Action::LoadWorkspaces]);
    }

    #[test]
    fn test_first_load_triggers_diff_for_selection() {
        let mut app = App::new();
        let actions = app.apply(&Msg::WorkspacesLoaded(Ok(items(&["default", "agent-1"]))));
        assert_eq!(actions, vec![Action::LoadDiff { workspace: "default".to_string() }]);
        assert_eq!(app.diff.for_workspace(), Some("default"));
    }

    #[test]
    fn test_moving_cursor_loads_new_diff() {
        let mut app = loaded_app(&["default", "agent-1"]);
        let actions = app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(actions, vec![Action::LoadDiff { workspace: "agent-1".to_string() }]);
    }

    #[test]
    fn test_unmoved_cursor_does_not_reload_diff() {
        let mut app = loaded_app(&["default"]);
        let actions = app.handle_key(key(KeyCode::Char('k')));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app(&["default"]);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = loaded_app(&["default"]);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_is_text_during_name_entry() {
        let mut app = loaded_app(&["default"]);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.list.in_name_entry());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(app.list.in_name_entry());
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut app = loaded_app(&["default"]);
        assert_eq!(app.focus, Focus::WorkspaceList);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::DiffView);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::WorkspaceList);
    }

    #[test]
    fn test_delete_flow_requires_confirmation() {
        let mut app = loaded_app(&["default", "agent-1"]);
        app.handle_key(key(KeyCode::Char('j')));

        let actions = app.handle_key(key(KeyCode::Char('d')));
        assert!(actions.is_empty());
        assert!(app.confirm.visible());

        // Declining leaves everything untouched.
        let actions = app.handle_key(key(KeyCode::Char('n')));
        assert!(actions.is_empty());
        assert!(!app.confirm.visible());

        app.handle_key(key(KeyCode::Char('d')));
        let actions = app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(actions, vec![Action::DeleteWorkspace { name: "agent-1".to_string() }]);
    }

    #[test]
    fn test_overlay_swallows_global_keys() {
        let mut app = loaded_app(&["default", "agent-1"]);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('d')));

        let actions = app.handle_key(key(KeyCode::Char('q')));
        assert!(actions.is_empty());
        assert!(!app.should_quit);
        assert!(app.confirm.visible());
    }

    #[test]
    fn test_create_flow_is_optimistic() {
        let mut app = loaded_app(&["default"]);
        app.handle_key(key(KeyCode::Char('a')));
        let actions = app.handle_key(key(KeyCode::Enter));
        assert!(actions.contains(&Action::CreateWorkspace { name: "agent-1".to_string() }));
        assert_eq!(app.list.pending_create(), Some("agent-1"));

        let actions = app.apply(&Msg::WorkspaceAdded {
            name: "agent-1".to_string(),
            result: Ok(()),
        });
        assert!(actions.contains(&Action::LoadWorkspaces));
        assert!(app.list.pending_create().is_none());
    }

    #[test]
    fn test_refresh_reloads_list_and_diff() {
        let mut app = loaded_app(&["default"]);
        let actions = app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            actions,
            vec![
                Action::LoadWorkspaces,
                Action::LoadDiff { workspace: "default".to_string() },
            ]
        );
    }
}
