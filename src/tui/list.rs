//! Workspace list pane.
//!
//! Owns the cursor, the name-entry mode for creating workspaces, and the
//! optimistic "pending create" row that is shown until the async create
//! result arrives.

use super::input::TextInput;
use super::msg::{Action, Msg};
use super::pane::Pane;
use super::colors;
use crate::workspace::{AgentState, DEFAULT_WORKSPACE, WorkspaceItem};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Prefix used for generated workspace names.
const NAME_PREFIX: &str = "agent";

/// True for characters allowed in workspace names; everything else is
/// dropped during name entry.
fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// The workspace list model.
#[derive(Debug, Default)]
pub struct WorkspaceListPane {
    items: Vec<WorkspaceItem>,
    cursor: usize,
    input: Option<TextInput>,
    pending_create: Option<String>,
    notice: Option<String>,
    loaded: bool,
}

impl WorkspaceListPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name under the cursor, if any.
    pub fn selected_name(&self) -> Option<&str> {
        self.items.get(self.cursor).map(|item| item.workspace.name.as_str())
    }

    /// Whether the pane is in name-entry mode.
    pub fn in_name_entry(&self) -> bool {
        self.input.is_some()
    }

    /// The optimistic create that has not been confirmed yet.
    pub fn pending_create(&self) -> Option<&str> {
        self.pending_create.as_deref()
    }

    /// Items currently shown (confirmed only).
    pub fn items(&self) -> &[WorkspaceItem] {
        &self.items
    }

    /// Minimum useful width: longest name plus indicator and padding.
    pub fn min_width(&self) -> u16 {
        let longest = self
            .items
            .iter()
            .map(|item| item.workspace.name.len())
            .chain(self.pending_create.iter().map(|name| name.len() + 11))
            .max()
            .unwrap_or(0);
        longest as u16 + 4
    }

    /// Lowest unused `agent-N` over the current list and pending create.
    fn generate_name(&self) -> String {
        let taken = |name: &str| {
            self.items.iter().any(|item| item.workspace.name == name)
                || self.pending_create.as_deref() == Some(name)
        };
        let mut n = 1;
        loop {
            let candidate = format!("{NAME_PREFIX}-{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Handle a key event in either normal or name-entry mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if self.input.is_some() {
            return self.handle_name_entry(key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(name) = self.selected_name() {
                    return vec![Action::LoadDiff { workspace: name.to_string() }];
                }
            }
            KeyCode::Char('a') => {
                self.input = Some(TextInput::with_content(&self.generate_name()));
            }
            KeyCode::Char('d') => {
                if let Some(name) = self.selected_name()
                    && name != DEFAULT_WORKSPACE
                {
                    return vec![Action::ConfirmDelete { name: name.to_string() }];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    /// Key handling for name-entry mode.
    ///
    /// Submitting an empty or duplicate name is a no-op that stays in
    /// entry mode; a valid unique name dispatches an async create and
    /// returns to normal mode immediately.
    fn handle_name_entry(&mut self, key: KeyEvent) -> Vec<Action> {
        let Some(input) = self.input.as_mut() else {
            return Vec::new();
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => input.clear(),
                KeyCode::Char('a') => input.move_home(),
                KeyCode::Char('e') => input.move_end(),
                KeyCode::Char('c') => {
                    self.input = None;
                }
                _ => {}
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => {
                self.input = None;
            }
            KeyCode::Enter => {
                let name = input.content().trim().to_string();
                if name.is_empty() {
                    return Vec::new();
                }
                if self.items.iter().any(|item| item.workspace.name == name) {
                    return Vec::new();
                }
                self.input = None;
                self.pending_create = Some(name.clone());
                self.notice = None;
                return vec![Action::CreateWorkspace { name }];
            }
            KeyCode::Backspace => input.backspace(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Char(c) if is_valid_name_char(c) => input.insert(c),
            _ => {}
        }
        Vec::new()
    }

    fn indicator(item: &WorkspaceItem) -> Span<'static> {
        if item.workspace.name == DEFAULT_WORKSPACE {
            return Span::styled("◆", Style::default().fg(colors::DEFAULT_WS));
        }
        match item.state {
            AgentState::Running => Span::styled("●", Style::default().fg(colors::RUNNING)),
            _ => Span::styled("○", Style::default().fg(colors::IDLE)),
        }
    }
}

impl Pane for WorkspaceListPane {
    fn init(&mut self) -> Vec<Action> {
        vec![Action::LoadWorkspaces]
    }

    fn update(&mut self, msg: &Msg) -> Vec<Action> {
        match msg {
            Msg::WorkspacesLoaded(Ok(items)) => {
                self.items = items.clone();
                self.loaded = true;
                if self.cursor >= self.items.len() {
                    self.cursor = self.items.len().saturating_sub(1);
                }
            }
            Msg::WorkspacesLoaded(Err(err)) => {
                // Keep the previous snapshot visible rather than blanking
                // the list.
                warn!("workspace list load failed: {err}");
            }
            Msg::WorkspaceAdded { name, result } => {
                self.pending_create = None;
                match result {
                    Ok(()) => return vec![Action::LoadWorkspaces],
                    Err(err) => {
                        self.notice = Some(format!("create '{name}' failed: {err}"));
                    }
                }
            }
            Msg::WorkspaceDeleted { name, result } => {
                if let Err(err) = result {
                    self.notice = Some(format!("delete '{name}' failed: {err}"));
                }
                // Reload either way: a partial deletion may have occurred.
                return vec![Action::LoadWorkspaces];
            }
            Msg::DiffLoaded { .. } => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(colors::HEADER)
        } else {
            Style::default().fg(colors::DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Workspaces ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        if !self.loaded {
            lines.push(Line::from(Span::styled(
                "Loading workspaces...",
                Style::default().fg(colors::DIM),
            )));
        }
        for (i, item) in self.items.iter().enumerate() {
            let mut spans = vec![Self::indicator(item), Span::raw(" ")];
            spans.push(Span::raw(item.workspace.name.clone()));
            let mut line = Line::from(spans);
            if i == self.cursor && !self.in_name_entry() {
                line = line.style(Style::default().bg(colors::SELECTION).bold());
            }
            lines.push(line);
        }
        if let Some(pending) = &self.pending_create {
            lines.push(Line::from(Span::styled(
                format!("+ {pending} (creating...)"),
                Style::default().fg(colors::DIM).italic(),
            )));
        }
        if let Some(input) = &self.input {
            lines.push(Line::from(Span::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(colors::DIM),
            )));
            let before = &input.content()[..input.cursor()];
            let after = &input.content()[input.cursor()..];
            lines.push(Line::from(vec![
                Span::styled("+ ", Style::default().fg(colors::RUNNING)),
                Span::raw(before.to_string()),
                Span::styled("▌", Style::default().fg(colors::HEADER)),
                Span::raw(after.to_string()),
            ]));
            lines.push(Line::from(Span::styled(
                "Enter: create  Esc: cancel",
                Style::default().fg(colors::DIM),
            )));
        }
        if let Some(notice) = &self.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(colors::ERROR),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
