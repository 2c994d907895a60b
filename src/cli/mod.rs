//! CLI module for dojo - command-line interface and subcommands.
//!
//! Provides the main entry point: run an agent in a fresh workspace,
//! list workspaces, or launch the TUI.

pub mod commands;

pub use commands::{Cli, Commands};
