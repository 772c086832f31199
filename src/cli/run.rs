use super::ui;
use crate::core::PageSource;
use crate::core::config::EtlConfig;
use crate::etl::{FileProgressLog, Pipeline, RunReport};
use crate::providers::{FilePageSource, HttpPageSource};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

impl RunReport {
    pub fn display_summary(&self, config: &EtlConfig) -> String {
        format!(
            "{} {} {}\n{} {}\n{} {}",
            ui::style_text("Records loaded:", ui::StyleType::TotalLabel),
            ui::style_text(&self.records.to_string(), ui::StyleType::TotalValue),
            ui::style_text(&format!("(table {})", config.table_name), ui::StyleType::Subtle),
            ui::style_text("CSV:", ui::StyleType::TotalLabel),
            config.csv_path.display(),
            ui::style_text("Database:", ui::StyleType::TotalLabel),
            config.database_path.display(),
        )
    }
}

/// Runs the pipeline and prints each fixed query with its results.
///
/// The page is read from `source_file` when given, else fetched from the
/// configured URL.
pub async fn run(config: &EtlConfig, source_file: Option<&Path>) -> Result<()> {
    let source: Arc<dyn PageSource> = match source_file {
        Some(path) => Arc::new(FilePageSource::new(path)),
        None => Arc::new(HttpPageSource::new(&config.source_url)),
    };
    let progress = Arc::new(FileProgressLog::new(&config.log_path));

    let report = Pipeline::new(config.clone(), source, progress).run().await?;

    for query in &report.queries {
        println!("{}", query.display_as_table());
        ui::print_separator();
    }
    println!("{}", report.display_summary(config));

    Ok(())
}
