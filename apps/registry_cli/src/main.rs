mod commands;
mod config;
mod render;
mod shell;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directory_core::{Directory, HttpClientService};
use shared::domain::{ClientId, NewClient};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "registry", about = "Client registry operator console")]
struct Cli {
    /// Registry base URL; overrides the config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Config file to read instead of ./registry.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and print every client.
    List,
    /// Print the clients the registry matches for a query.
    Filter { query: String },
    /// Register a new client.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Delete a client after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the optimized visiting route.
    Route {
        #[arg(long)]
        refresh: bool,
    },
    /// Interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref(), cli.server_url.clone())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(server_url = %settings.server_url, "cli: starting");
    let service = HttpClientService::new(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("cannot use registry at '{}'", settings.server_url))?;
    let directory = Directory::over_http(service);

    let succeeded = run_command(&directory, cli.command).await?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs one subcommand and prints its notices. `false` when anything failed.
async fn run_command(directory: &Directory, command: Command) -> Result<bool> {
    if let Command::Shell = command {
        shell::run(directory).await?;
        return Ok(true);
    }

    let mut events = directory.subscribe();
    let succeeded = match command {
        Command::List => commands::list(directory).await,
        Command::Filter { query } => {
            directory.load().await;
            commands::filter(directory, &query).await
        }
        Command::Create {
            name,
            email,
            phone,
            x,
            y,
        } => commands::create(directory, NewClient::new(name, email, phone, x, y)).await,
        Command::Delete { id, yes } => {
            let confirmed = yes || {
                let mut lines = BufReader::new(io::stdin()).lines();
                shell::confirm(&mut lines, &mut io::stdout()).await?
            };
            if confirmed {
                commands::delete(directory, ClientId::from(id)).await
            } else {
                println!("Exclusão cancelada.");
                true
            }
        }
        Command::Route { refresh } => {
            directory.load().await;
            commands::route(directory, refresh).await
        }
        Command::Shell => true,
    };
    let errors = render::flush_notices(&mut events);
    Ok(succeeded && errors == 0)
}
