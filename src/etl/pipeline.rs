//! Drives one extract, transform, load and query run from start to finish.

use crate::core::config::EtlConfig;
use crate::core::{
    ExtractionError, IoError, MissingRateError, PageSource, QueryError, RateLoadError,
};
use crate::etl::extract::{TableLayout, extract};
use crate::etl::load::{save_csv, save_table};
use crate::etl::progress::ProgressLog;
use crate::etl::query::{ResultSet, run_query};
use crate::etl::rates::load_rates;
use crate::etl::transform::transform;
use crate::store::{Database, quote_identifier};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Pipeline states, in the only order they can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    Extracted,
    Transformed,
    CsvSaved,
    DbConnected,
    DbLoaded,
    Queried,
    Closed,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Stage::Init => "init",
                Stage::Extracted => "extracted",
                Stage::Transformed => "transformed",
                Stage::CsvSaved => "csv saved",
                Stage::DbConnected => "db connected",
                Stage::DbLoaded => "db loaded",
                Stage::Queried => "queried",
                Stage::Closed => "closed",
            }
        )
    }
}

/// The error that halted a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to fetch source page: {0:#}")]
    Fetch(anyhow::Error),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    RateLoad(#[from] RateLoadError),

    #[error(transparent)]
    MissingRate(#[from] MissingRateError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A halted run: the originating error and the last stage completed.
#[derive(Error, Debug)]
#[error("{error} (pipeline stopped at stage: {stage})")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    pub sql: String,
    pub result: ResultSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub stage: Stage,
    pub records: usize,
    pub queries: Vec<ExecutedQuery>,
}

pub const MSG_STARTED: &str = "Preliminaries complete. Initiating ETL process";
pub const MSG_EXTRACTED: &str = "Data extraction complete. Initiating Transformation process";
pub const MSG_TRANSFORMED: &str = "Data transformation complete. Initiating Loading process";
pub const MSG_CSV_SAVED: &str = "Data saved to CSV file";
pub const MSG_DB_CONNECTED: &str = "SQL Connection initiated";
pub const MSG_DB_LOADED: &str = "Data loaded to Database as a table, Executing queries";
pub const MSG_QUERIED: &str = "Process Complete";
pub const MSG_CLOSED: &str = "Server Connection closed";

/// Every row, the average GBP market cap, then the names of the first five rows.
pub fn fixed_queries(table_name: &str) -> [String; 3] {
    let table = quote_identifier(table_name);
    [
        format!("SELECT * FROM {table}"),
        format!("SELECT AVG(MC_GBP_Billion) FROM {table}"),
        format!("SELECT Name FROM {table} LIMIT 5"),
    ]
}

pub struct Pipeline {
    config: EtlConfig,
    layout: TableLayout,
    source: Arc<dyn PageSource>,
    progress: Arc<dyn ProgressLog>,
}

impl Pipeline {
    pub fn new(
        config: EtlConfig,
        source: Arc<dyn PageSource>,
        progress: Arc<dyn ProgressLog>,
    ) -> Self {
        Self {
            config,
            layout: TableLayout::default(),
            source,
            progress,
        }
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Runs every stage in order. The first failure stops the run; sinks
    /// already written are left as they are.
    pub async fn run(&self) -> Result<RunReport, PipelineFailure> {
        let mut stage = Stage::Init;
        self.progress.log(MSG_STARTED);

        match self.execute(&mut stage).await {
            Ok(report) => {
                info!("Pipeline finished with {} records", report.records);
                Ok(report)
            }
            Err(error) => {
                error!(%stage, error = %error, "Pipeline halted");
                Err(PipelineFailure { stage, error })
            }
        }
    }

    fn advance(&self, stage: &mut Stage, next: Stage, message: &str) {
        debug!("Stage {} -> {}", stage, next);
        *stage = next;
        self.progress.log(message);
    }

    async fn execute(&self, stage: &mut Stage) -> Result<RunReport, PipelineError> {
        let markup = self.source.fetch().await.map_err(PipelineError::Fetch)?;
        let records = extract(&markup, &self.layout)?;
        self.advance(stage, Stage::Extracted, MSG_EXTRACTED);

        let rates = load_rates(&self.config.rates_path)?;
        let dataset = transform(records, &rates)?;
        self.advance(stage, Stage::Transformed, MSG_TRANSFORMED);

        save_csv(&dataset, &self.config.csv_path)?;
        self.advance(stage, Stage::CsvSaved, MSG_CSV_SAVED);

        let mut db = Database::open(&self.config.database_path)?;
        self.advance(stage, Stage::DbConnected, MSG_DB_CONNECTED);

        save_table(&dataset, &mut db, &self.config.table_name)?;
        self.advance(stage, Stage::DbLoaded, MSG_DB_LOADED);

        let mut queries = Vec::new();
        for sql in fixed_queries(&self.config.table_name) {
            let result = run_query(&sql, &db)?;
            queries.push(ExecutedQuery { sql, result });
        }
        self.advance(stage, Stage::Queried, MSG_QUERIED);

        db.close()?;
        self.advance(stage, Stage::Closed, MSG_CLOSED);

        Ok(RunReport {
            stage: *stage,
            records: dataset.len(),
            queries,
        })
    }
}
