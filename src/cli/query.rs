use super::ui;
use crate::core::config::EtlConfig;
use crate::etl::pipeline::ExecutedQuery;
use crate::etl::{ResultSet, run_query};
use crate::store::Database;
use anyhow::{Context, Result, bail};
use tracing::info;

impl ResultSet {
    pub fn display_as_table(&self) -> String {
        if self.columns.is_empty() {
            return ui::style_text("(no columns)", ui::StyleType::Subtle);
        }

        let mut table = ui::new_styled_table();
        table.set_header(self.columns.iter().map(|c| ui::header_cell(c)));
        for row in &self.rows {
            table.add_row(row.iter().map(ui::value_cell));
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&format!("{} row(s)", self.rows.len()), ui::StyleType::Subtle)
        ));
        output
    }
}

impl ExecutedQuery {
    pub fn display_as_table(&self) -> String {
        format!(
            "Query: {}\n\n{}",
            ui::style_text(&self.sql, ui::StyleType::Title),
            self.result.display_as_table()
        )
    }
}

/// Runs a single read-only statement against the configured database.
pub fn run(config: &EtlConfig, sql: &str) -> Result<()> {
    let path = &config.database_path;
    if !path.exists() {
        bail!(
            "Database {} does not exist, run the pipeline first",
            path.display()
        );
    }

    let mut db = Database::open(path)?;
    let result = run_query(sql, &db).with_context(|| format!("Query failed: {sql}"))?;
    db.close()?;
    info!("Query returned {} rows", result.rows.len());

    let executed = ExecutedQuery {
        sql: sql.to_string(),
        result,
    };
    println!("{}", executed.display_as_table());
    Ok(())
}
