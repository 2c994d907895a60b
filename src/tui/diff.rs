//! Diff view pane.
//!
//! Shows the working-copy diff of the selected workspace. Loads are
//! last-write-wins: a result is applied only if it is for the workspace
//! the pane is currently showing, so a stale response from a previous
//! selection can never overwrite a newer one.

use super::colors;
use super::msg::{Action, Msg};
use super::pane::Pane;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

#[derive(Debug, Default)]
pub struct DiffPane {
    content: String,
    error: Option<String>,
    loading: bool,
    for_workspace: Option<String>,
    scroll: u16,
}

impl DiffPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workspace whose diff the pane is showing or loading.
    pub fn for_workspace(&self) -> Option<&str> {
        self.for_workspace.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark the pane as loading `workspace`. Results for any other
    /// workspace are discarded from here on.
    pub fn begin_load(&mut self, workspace: &str) {
        if self.for_workspace.as_deref() != Some(workspace) {
            self.scroll = 0;
        }
        self.for_workspace = Some(workspace.to_string());
        self.loading = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(20);
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(20);
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll = 0;
            }
            _ => {}
        }
        Vec::new()
    }

    fn styled_line(raw: &str) -> Line<'static> {
        let style = if raw.starts_with('+') && !raw.starts_with("+++") {
            Style::default().fg(colors::ADDED)
        } else if raw.starts_with('-') && !raw.starts_with("---") {
            Style::default().fg(colors::REMOVED)
        } else if raw.starts_with("diff ") || raw.starts_with("@@") {
            Style::default().fg(colors::HEADER).bold()
        } else {
            Style::default()
        };
        Line::from(Span::styled(raw.to_string(), style))
    }
}

impl Pane for DiffPane {
    fn update(&mut self, msg: &Msg) -> Vec<Action> {
        if let Msg::DiffLoaded { workspace, result } = msg {
            if self.for_workspace.as_deref() != Some(workspace.as_str()) {
                return Vec::new();
            }
            self.loading = false;
            match result {
                Ok(diff) => {
                    self.content = diff.clone();
                    self.error = None;
                }
                Err(err) => {
                    self.error = Some(err.to_string());
                }
            }
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(colors::HEADER)
        } else {
            Style::default().fg(colors::DIM)
        };
        let title = match &self.for_workspace {
            Some(name) => format!(" Diff: {name} "),
            None => " Diff ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(error) = &self.error {
            let para = Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(colors::ERROR),
            )));
            frame.render_widget(para, inner);
            return;
        }
        if self.loading && self.content.is_empty() {
            let para = Paragraph::new(Line::from(Span::styled(
                "Loading diff...",
                Style::default().fg(colors::DIM),
            )));
            frame.render_widget(para, inner);
            return;
        }
        if self.content.trim().is_empty() {
            let para = Paragraph::new(Line::from(Span::styled(
                "No changes in this workspace",
                Style::default().fg(colors::DIM).italic(),
            )));
            frame.render_widget(para, inner);
            return;
        }

        let lines: Vec<Line> = self.content.lines().map(Self::styled_line).collect();
        let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
        let scroll = self.scroll.min(max_scroll);
        let para = Paragraph::new(lines).scroll((scroll, 0));
        frame.render_widget(para, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn loaded(workspace: &str, diff: &str) -> Msg {
        Msg::DiffLoaded {
            workspace: workspace.to_string(),
            result: Ok(diff.to_string()),
        }
    }

    #[test]
    fn test_result_for_current_workspace_is_applied() {
        let mut pane = DiffPane::new();
        pane.begin_load("agent-1");
        assert!(pane.is_loading());

        pane.update(&loaded("agent-1", "+added line"));
        assert!(!pane.is_loading());
        assert_eq!(pane.content, "+added line");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut pane = DiffPane::new();
        pane.begin_load("agent-1");
        pane.begin_load("agent-2");

        // Late arrival for the previous selection must not win.
        pane.update(&loaded("agent-1", "old diff"));
        assert!(pane.is_loading());
        assert_eq!(pane.content, "");

        pane.update(&loaded("agent-2", "new diff"));
        assert!(!pane.is_loading());
        assert_eq!(pane.content, "new diff");
    }

    #[test]
    fn test_error_is_shown_then_cleared_by_success() {
        let mut pane = DiffPane::new();
        pane.begin_load("agent-1");
        pane.update(&Msg::DiffLoaded {
            workspace: "agent-1".to_string(),
            result: Err(std::io::Error::other("jj exploded").into()),
        });
        assert!(pane.error.as_ref().unwrap().contains("jj exploded"));

        pane.begin_load("agent-1");
        pane.update(&loaded("agent-1", "+fixed"));
        assert!(pane.error.is_none());
    }

    #[test]
    fn test_scroll_resets_on_workspace_change_only() {
        let mut pane = DiffPane::new();
        pane.begin_load("agent-1");
        pane.update(&loaded("agent-1", "line\nline\nline"));
        pane.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        pane.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(pane.scroll, 2);

        // Reload of the same workspace keeps the position.
        pane.begin_load("agent-1");
        assert_eq!(pane.scroll, 2);

        pane.begin_load("agent-2");
        assert_eq!(pane.scroll, 0);
    }

    #[test]
    fn test_scroll_does_not_underflow() {
        let mut pane = DiffPane::new();
        pane.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE));
        assert_eq!(pane.scroll, 0);
    }
}
