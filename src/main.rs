use anyhow::Result;
use bankcap::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

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

impl From<Commands> for bankcap::AppCommand {
    fn from(cmd: Commands) -> bankcap::AppCommand {
        match cmd {
            Commands::Run { source_file } => bankcap::AppCommand::Run { source_file },
            Commands::Query { sql } => bankcap::AppCommand::Query { sql },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Extract, convert and store the largest banks table, then run the report queries
    Run {
        /// Read the source page from a saved HTML file instead of the configured URL
        #[arg(long)]
        source_file: Option<PathBuf>,
    },
    /// Run a read-only SQL query against the stored table
    Query {
        /// SQL statement to execute
        sql: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bankcap::cli::setup::setup(),
        Some(cmd) => bankcap::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
