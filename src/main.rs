use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cnbrates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cnbrates::AppCommand {
    fn from(cmd: Commands) -> cnbrates::AppCommand {
        match cmd {
            Commands::Import => cnbrates::AppCommand::Import,
            Commands::Fetch => cnbrates::AppCommand::Fetch,
            Commands::Rates => cnbrates::AppCommand::Rates,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch CNB rates and save them to the rate store
    Import,
    /// Fetch CNB rates and display them without saving
    Fetch,
    /// Display stored rates
    Rates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => cnbrates::cli::setup::setup_at_path(path),
            None => cnbrates::cli::setup::setup(),
        },
        Some(cmd) => cnbrates::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
