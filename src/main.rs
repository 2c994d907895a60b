use clap::Parser;
use colored::*;
use dojo::cli::{Cli, Commands};
use dojo::config::Config;
use dojo::jj::Client;
use dojo::tui::{TuiRunner, init_terminal, restore_terminal};
use dojo::agent;
use dojo::workspace::WorkspaceManager;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{BufRead, Write, stdin, stdout};
use std::path::PathBuf;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dojo")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("dojo.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn make_manager(config: &Config) -> Result<WorkspaceManager> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let client = Client::new(cwd).with_jj_bin(&config.jj.bin);
    info!("using jj binary: {}", client.jj_bin());
    match WorkspaceManager::discover(client) {
        Ok(manager) => Ok(manager),
        Err(err) if err.is_not_repo() => {
            eprintln!(
                "{} not inside a jj repository (run `jj git init` first)",
                "error:".red().bold()
            );
            std::process::exit(1);
        }
        Err(err) => Err(err).context("Failed to resolve repository root"),
    }
}

/// Create a workspace, run the agent inside it, clean up afterwards.
fn run_agent(name: &str, config: &Config) -> Result<()> {
    let manager = make_manager(config)?;

    let workspace_path = match manager.create(name) {
        Ok(path) => path,
        Err(err) if err.is_workspace_exists() => {
            eprintln!(
                "{} workspace '{}' already exists",
                "error:".red().bold(),
                name
            );
            eprintln!("Use 'dojo list' to see existing workspaces");
            std::process::exit(1);
        }
        Err(err) => return Err(err).context(format!("Failed to create workspace '{name}'")),
    };

    println!(
        "{} workspace '{}' at {}",
        "created".green(),
        name,
        workspace_path.display()
    );

    let pid_cache = manager.pid_cache_path(name);
    let status = agent::run(&config.agent, &workspace_path, &pid_cache);

    match &status {
        Ok(exit) => info!("agent in '{name}' exited with {exit}"),
        Err(err) => eprintln!("{} agent failed: {}", "error:".red().bold(), err),
    }

    if keep_workspace()? {
        println!("Keeping workspace '{name}' at {}", workspace_path.display());
        return Ok(());
    }

    manager
        .cleanup(name)
        .context(format!("Failed to clean up workspace '{name}'"))?;
    println!("{} workspace '{}'", "removed".yellow(), name);

    status.map(|_| ()).map_err(Into::into)
}

/// Ask whether to keep the workspace for inspection. Defaults to no.
fn keep_workspace() -> Result<bool> {
    print!("Keep workspace for inspection? [y/N] ");
    stdout().flush()?;
    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Print agent workspace names only; the default workspace is not an
/// agent workspace and stays out of the one-shot listing.
fn list_workspaces(config: &Config) -> Result<()> {
    let manager = make_manager(config)?;
    let names = manager.list().context("Failed to list workspaces")?;
    for name in names {
        let state = match manager.agent_state(&name) {
            dojo::workspace::AgentState::Running => "running".green(),
            dojo::workspace::AgentState::Idle => "idle".yellow(),
            dojo::workspace::AgentState::None => "".normal(),
        };
        println!("{:<24} {}", name, state);
    }
    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let manager = make_manager(config)?;

    let terminal = init_terminal()?;
    let mut runner = TuiRunner::new(terminal, manager, config);
    let result = runner.run().await;

    // Always restore, even if the loop errored.
    restore_terminal()?;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    if let Some(name) = cli.run_name() {
        let name = name.to_string();
        return run_agent(&name, &config);
    }

    match cli.command {
        Some(Commands::List) => list_workspaces(&config),
        _ => run_tui(&config).await,
    }
}
