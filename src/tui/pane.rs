//! The pane capability interface.
//!
//! Each region of the screen is a model implementing [`Pane`]: it can
//! emit initial actions, fold completion messages into its state, and
//! render itself. The app routes messages by variant to every pane and
//! key events to the focused one only.

use super::msg::{Action, Msg};
use ratatui::Frame;
use ratatui::layout::Rect;

pub trait Pane {
    /// Actions to dispatch when the TUI starts.
    fn init(&mut self) -> Vec<Action> {
        Vec::new()
    }

    /// Fold a completion message into pane state, possibly emitting
    /// follow-up actions.
    fn update(&mut self, msg: &Msg) -> Vec<Action>;

    /// Render the pane into `area`.
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}
