pub mod cli;
pub mod core;
pub mod etl;
pub mod providers;
pub mod store;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Run { source_file: Option<PathBuf> },
    Query { sql: String },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Bank market cap ETL starting...");

    let config = crate::core::config::EtlConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Run { source_file } => cli::run::run(&config, source_file.as_deref()).await,
        AppCommand::Query { sql } => cli::query::run(&config, &sql),
    }
}
