//! Dojo - isolated jj workspaces for coding agents
//!
//! Dojo drives the `jj` command-line tool to create throwaway workspaces
//! under `.jj/agents/`, launches an agent process inside them with git
//! disabled, and provides an interactive TUI for browsing workspaces and
//! their diffs.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod jj;
pub mod tui;
pub mod workspace;

pub use error::{DojoError, Result};
