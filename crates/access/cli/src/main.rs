//! accessctl - Command-line interface for module-access decisions
//!
//! This CLI gives operators a terminal view of the console's route guard:
//! - Evaluate whether a session may enter a protected route section
//! - Store, inspect and clear the session the guard reads
//! - List the known console modules and their codes

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{check, modules, session};
use config::CliConfig;
use error::CliResult;

/// accessctl application
#[derive(Parser)]
#[command(name = "accessctl")]
#[command(about = "Inspect facility console module-access decisions", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ACCESSCTL_CONFIG")]
    config: Option<String>,

    /// Session file (overrides configuration)
    #[arg(short, long)]
    session_file: Option<std::path::PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Evaluate access for a route
    Check(check::CheckArgs),

    /// Manage the stored session
    Session {
        #[command(subcommand)]
        command: session::SessionCommands,
    },

    /// List known console modules
    Modules,

    /// Show effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Check(args) => check::execute(args, &config, cli.output),
        Commands::Session { command } => {
            session::execute(command, &config, cli.output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Modules => {
            modules::execute(cli.output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            if matches!(cli.output, output::OutputFormat::Table) {
                output::print_info(&format!("Session file: {}", config.session_file.display()));
            }
            output::print_single(&config, cli.output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(config: &CliConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    // Logs go to stderr so structured output on stdout stays parseable
    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
