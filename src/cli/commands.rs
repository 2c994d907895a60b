//! CLI command definitions using clap.
//!
//! `dojo <name>` is shorthand for `dojo run <name>`; a bare `dojo`
//! launches the TUI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dojo - jj workspace orchestrator for AI agents
#[derive(Parser, Debug)]
#[command(name = "dojo")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace name (shorthand for `dojo run <name>`)
    pub name: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The workspace name to run an agent in, from either form.
    pub fn run_name(&self) -> Option<&str> {
        match (&self.name, &self.command) {
            (Some(name), _) => Some(name),
            (None, Some(Commands::Run { name })) => Some(name),
            _ => None,
        }
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workspace, run the agent in it, clean up afterwards
    Run {
        /// Workspace name
        name: String,
    },

    /// List agent workspaces
    List,

    /// Launch the interactive TUI (default)
    Tui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_has_no_run_name() {
        let cli = Cli::parse_from(["dojo"]);
        assert!(cli.run_name().is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_positional_name_shorthand() {
        let cli = Cli::parse_from(["dojo", "agent-1"]);
        assert_eq!(cli.run_name(), Some("agent-1"));
    }

    #[test]
    fn test_run_subcommand() {
        let cli = Cli::parse_from(["dojo", "run", "agent-1"]);
        assert_eq!(cli.run_name(), Some("agent-1"));
    }

    #[test]
    fn test_list_subcommand() {
        let cli = Cli::parse_from(["dojo", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        assert!(cli.run_name().is_none());
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["dojo", "--config", "/tmp/dojo.yml", "list"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/dojo.yml")));
    }
}
