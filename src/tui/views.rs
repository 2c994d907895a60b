//! Top-level layout.
//!
//! Title bar, workspace list on the left, diff view on the right, help
//! bar at the bottom, confirmation overlay on top of everything.

use super::app::{App, Focus};
use super::colors;
use super::pane::Pane;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Render the full frame from app state.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let title = Line::from(vec![
        Span::styled(" DOJO ", Style::default().fg(colors::HEADER).bold()),
        Span::styled("jj workspace orchestrator", Style::default().fg(colors::DIM)),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    // The list takes what its longest name needs, within bounds.
    let max_list_width = (chunks[1].width / 3).max(15);
    let list_width = app.list.min_width().clamp(15, max_list_width);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(list_width), Constraint::Min(10)])
        .split(chunks[1]);

    app.list.render(frame, body[0], app.focus == Focus::WorkspaceList);
    app.diff.render(frame, body[1], app.focus == Focus::DiffView);

    frame.render_widget(Paragraph::new(help_line(app)), chunks[2]);

    // Overlay last so it sits above both panes.
    app.confirm.render(frame, frame.area());
}

fn help_line(app: &App) -> Line<'static> {
    let bindings: &[(&str, &str)] = if app.confirm.visible() {
        &[("y", "confirm"), ("n/esc", "cancel")]
    } else if app.list.in_name_entry() {
        &[("enter", "create"), ("esc", "cancel")]
    } else {
        &[
            ("j/k", "move"),
            ("a", "add"),
            ("d", "delete"),
            ("r", "refresh"),
            ("tab", "focus"),
            ("q", "quit"),
        ]
    };

    let mut spans = Vec::new();
    for (key, desc) in bindings {
        spans.push(Span::styled(format!(" {key}"), Style::default().fg(colors::KEYBIND).bold()));
        spans.push(Span::styled(format!(":{desc} "), Style::default().fg(colors::DIM)));
    }
    Line::from(spans)
}
