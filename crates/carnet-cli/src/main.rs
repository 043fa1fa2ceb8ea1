use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use carnet_remote::HttpBackend;
use carnet_store::{AppState, default_snapshot_path};

mod cli;
mod commands;
mod config;
mod format;

use cli::{Cli, Commands};
use config::{Config, resolve_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "carnet", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Config commands never touch the remote store.
    if let Commands::Config { action } = &cli.command {
        return commands::config::run(action.clone());
    }

    let app_config = Config::load();
    let server_url = resolve_server(cli.server.as_deref(), &app_config);
    tracing::debug!("using document store at {server_url}");
    let backend = Arc::new(HttpBackend::new(&server_url)?);

    let snapshot_path = if app_config.snapshot {
        default_snapshot_path()
    } else {
        None
    };
    let state = AppState::new(backend, snapshot_path);
    state.restore_snapshot().await?;

    match cli.command {
        Commands::Vehicles { action } => commands::vehicles::run(&state, action, cli.json).await?,
        Commands::Purchases { action } => {
            commands::purchases::run(&state, action, cli.json).await?
        }
        Commands::Charges { action } => commands::charges::run(&state, action, cli.json).await?,
        Commands::Stations { action } => {
            commands::stations::run(&state, &app_config, action, cli.json).await?
        }
        Commands::Chargers { action } => commands::chargers::run(&state, action, cli.json).await?,
        Commands::Stores { action } => commands::stores::run(&state, action, cli.json).await?,
        Commands::Dashboard => commands::dashboard::run(&state, cli.json).await?,
        Commands::Stats { vehicle } => commands::stats::run(&state, vehicle, cli.json).await?,
        Commands::Export { output } => commands::export::run(&state, output, cli.quiet).await?,
        Commands::Config { .. } | Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
