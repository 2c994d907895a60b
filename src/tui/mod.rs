//! Terminal user interface.
//!
//! A k9s-style two-pane layout: workspace list on the left, diff view
//! on the right. The TUI is message driven: key events and async
//! completion messages are applied one at a time to the app state, so
//! panes never need locks.

mod app;
mod confirm;
mod diff;
mod events;
mod input;
mod list;
mod msg;
mod pane;
mod runner;
mod views;

pub use app::{App, Focus};
pub use events::{Event, EventHandler};
pub use msg::{Action, Msg};
pub use pane::Pane;
pub use runner::TuiRunner;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enable raw mode and switch to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Status colors inspired by k9s.
pub mod colors {
    use ratatui::style::Color;

    pub const RUNNING: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const IDLE: Color = Color::Rgb(255, 215, 0); // Gold
    pub const DEFAULT_WS: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const WARNING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const ADDED: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const REMOVED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const SELECTION: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}
