//! Confirmation overlay.
//!
//! While visible, the overlay intercepts every key event before either
//! pane; it is the only state that may change while a lifecycle call is
//! in flight.

use super::colors;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Actions that require confirmation, with their opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the named workspace
    DeleteWorkspace(String),
}

/// How the user resolved the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    pub confirmed: bool,
    pub action: ConfirmAction,
}

/// The confirmation dialog model.
#[derive(Debug, Default)]
pub struct ConfirmDialog {
    prompt: String,
    action: Option<ConfirmAction>,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display the dialog with a prompt and the action to confirm.
    pub fn show(&mut self, prompt: impl Into<String>, action: ConfirmAction) {
        self.prompt = prompt.into();
        self.action = Some(action);
    }

    /// Hide the dialog, dropping any pending action.
    pub fn hide(&mut self) {
        self.prompt.clear();
        self.action = None;
    }

    pub fn visible(&self) -> bool {
        self.action.is_some()
    }

    /// Resolve a key press. `y` confirms, `n`/`Esc` declines with no side
    /// effect; anything else is swallowed while the dialog is up.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ConfirmOutcome> {
        let action = self.action.clone()?;
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.hide();
                Some(ConfirmOutcome { confirmed: true, action })
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.hide();
                Some(ConfirmOutcome { confirmed: false, action })
            }
            _ => None,
        }
    }

    /// Render the dialog centered in `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible() {
            return;
        }

        let width = (self.prompt.len() as u16 + 10).min(area.width);
        let [centered] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [centered] = Layout::vertical([Constraint::Length(3)])
            .flex(Flex::Center)
            .areas(centered);

        let line = Line::from(vec![
            Span::styled(self.prompt.clone(), Style::default().bold()),
            Span::raw(" "),
            Span::styled("(y/n)", Style::default().fg(colors::DIM)),
        ]);
        let dialog = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::WARNING)),
        );

        frame.render_widget(Clear, centered);
        frame.render_widget(dialog, centered);
    }
}
