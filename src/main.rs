// ABOUTME: Entry point for the riodeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use riodeploy::config::{self, CONFIG_FILENAME, Config};
use riodeploy::error::Result;
use riodeploy::output::Output;
use riodeploy::types::TeamNumber;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());
    let result = run(cli).await;

    if let Err(e) = result {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    let mode = cli.output_mode();
    let team = cli.team.as_deref();

    let load = |cwd: &Path| -> Result<(Config, Output)> {
        let mut config = Config::discover_or_default(cwd)?;
        if let Some(team) = team {
            config.team = TeamNumber::parse_lenient(team);
        }
        let output = Output::new(mode).with_verbose(cli.verbose || config.verbose);
        Ok((config, output))
    };

    match &cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, team, *force)?;
            Output::new(mode).success(&format!("Created {CONFIG_FILENAME}"));
            Ok(())
        }
        Commands::Check => {
            let (config, output) = load(&cwd)?;
            commands::check(&config, &output).await
        }
        Commands::Exec { admin, commands } => {
            let (config, output) = load(&cwd)?;
            commands::exec_command(&config, commands, *admin, &output).await
        }
        Commands::Push { admin, dest, files } => {
            let (config, output) = load(&cwd)?;
            commands::push(&config, files, dest, *admin, &output).await
        }
        Commands::Pull {
            admin,
            remote,
            local,
        } => {
            let (config, output) = load(&cwd)?;
            commands::pull(&config, remote, local, *admin, &output).await
        }
        Commands::Install { bundle } => {
            let (config, output) = load(&cwd)?;
            commands::install(config, bundle.as_deref(), output).await
        }
    }
}
