//! TUI runner and main event loop.
//!
//! The runner owns the terminal, the app, and the completion channel.
//! Each loop iteration renders, waits for one terminal event, then
//! drains any completion messages. All jj work runs off the loop in
//! blocking tasks that resolve to exactly one message.

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::msg::{Action, Msg};
use super::views::render;
use crate::config::Config;
use crate::error::DojoError;
use crate::jj::DiffOptions;
use crate::workspace::WorkspaceManager;
use eyre::Result;
use log::info;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ticks between background workspace list refreshes (agent state can
/// change without any keypress).
const REFRESH_TICKS: u32 = 20;

pub struct TuiRunner {
    terminal: Tui,
    app: App,
    event_handler: EventHandler,
    manager: Arc<WorkspaceManager>,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    diff_revision: Option<String>,
    ticks: u32,
}

impl TuiRunner {
    pub fn new(terminal: Tui, manager: WorkspaceManager, config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            terminal,
            app: App::new(),
            event_handler: EventHandler::new(config.tui.tick_rate_ms),
            manager: Arc::new(manager),
            tx,
            rx,
            diff_revision: config.tui.diff_revision.clone(),
            ticks: 0,
        }
    }

    /// Run the main loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        info!("starting TUI main loop");

        let actions = self.app.init();
        self.dispatch(actions);

        loop {
            self.terminal.draw(|f| render(&self.app, f))?;

            let event = self.event_handler.next().await?;
            match event {
                Event::Key(key) => {
                    let actions = self.app.handle_key(key);
                    self.dispatch(actions);
                }
                Event::Tick => {
                    self.ticks += 1;
                    if self.ticks % REFRESH_TICKS == 0 {
                        self.dispatch(vec![Action::LoadWorkspaces]);
                    }
                }
                Event::Resize(_, _) => {}
            }

            // Apply everything the async side finished since last pass.
            while let Ok(msg) = self.rx.try_recv() {
                let actions = self.app.apply(&msg);
                self.dispatch(actions);
            }

            if self.app.should_quit {
                break;
            }
        }

        info!("TUI main loop ended");
        Ok(())
    }

    fn dispatch(&self, actions: Vec<Action>) {
        for action in actions {
            self.perform(action);
        }
    }

    /// Start the async work for one action. Each spawned task sends back
    /// exactly one message; send failures mean the loop is gone and are
    /// ignored.
    fn perform(&self, action: Action) {
        let manager = Arc::clone(&self.manager);
        let tx = self.tx.clone();
        match action {
            Action::LoadWorkspaces => {
                tokio::spawn(async move {
                    let result = run_blocking(move || manager.list_items()).await;
                    let _ = tx.send(Msg::WorkspacesLoaded(result));
                });
            }
            Action::LoadDiff { workspace } => {
                let revision = self.diff_revision.clone();
                tokio::spawn(async move {
                    let name = workspace.clone();
                    let result = run_blocking(move || {
                        let opts = DiffOptions {
                            revision,
                            dir: Some(manager.diff_dir(&name)),
                            color: false,
                        };
                        Ok(manager.client().diff(&opts)?)
                    })
                    .await;
                    let _ = tx.send(Msg::DiffLoaded { workspace, result });
                });
            }
            Action::CreateWorkspace { name } => {
                tokio::spawn(async move {
                    let task_name = name.clone();
                    let result = run_blocking(move || manager.create(&task_name).map(|_| ())).await;
                    let _ = tx.send(Msg::WorkspaceAdded { name, result });
                });
            }
            Action::DeleteWorkspace { name } => {
                tokio::spawn(async move {
                    let task_name = name.clone();
                    let result = run_blocking(move || manager.cleanup(&task_name)).await;
                    let _ = tx.send(Msg::WorkspaceDeleted { name, result });
                });
            }
            // Resolved inside App::absorb; reaching here is a no-op.
            Action::ConfirmDelete { .. } => {}
        }
    }
}

/// Run a blocking jj/filesystem closure on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, DojoError>
where
    F: FnOnce() -> Result<T, DojoError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(err) => Err(DojoError::Io(std::io::Error::other(err))),
    }
}
