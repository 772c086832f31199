//! Persists the dataset to the CSV and SQLite sinks.

use crate::core::record::COLUMNS;
use crate::core::{EnrichedBankRecord, IoError};
use crate::store::{Database, quote_identifier};
use csv::WriterBuilder;
use rusqlite::params;
use std::path::Path;
use tracing::debug;

/// Writes the dataset as CSV, replacing any existing file at `path`.
///
/// The header row is always written, even for an empty dataset.
pub fn save_csv<P: AsRef<Path>>(dataset: &[EnrichedBankRecord], path: P) -> Result<(), IoError> {
    let path = path.as_ref();
    let io_error = |e: csv::Error| IoError::new(path, e);

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(io_error)?;
    writer.write_record(COLUMNS).map_err(io_error)?;
    for record in dataset {
        writer.serialize(record).map_err(io_error)?;
    }
    writer.flush().map_err(|e| IoError::new(path, e))?;

    debug!("Saved {} records to {}", dataset.len(), path.display());
    Ok(())
}

/// Replaces the table `table_name` with the dataset.
///
/// The table is dropped and recreated inside one transaction, so the table
/// only ever holds rows from a single call.
pub fn save_table(
    dataset: &[EnrichedBankRecord],
    db: &mut Database,
    table_name: &str,
) -> Result<(), IoError> {
    let path = db.path().to_path_buf();
    let db_error = |e: rusqlite::Error| IoError::new(&path, format!("table {table_name}: {e}"));
    let table = quote_identifier(table_name);

    let conn = db.connection_mut()?;
    let tx = conn.transaction().map_err(db_error)?;
    tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])
        .map_err(db_error)?;
    tx.execute(
        &format!(
            "CREATE TABLE {table} (\"{}\" TEXT, \"{}\" REAL, \"{}\" REAL, \"{}\" REAL, \"{}\" REAL)",
            COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
        ),
        [],
    )
    .map_err(db_error)?;

    {
        let mut insert = tx
            .prepare(&format!("INSERT INTO {table} VALUES (?1, ?2, ?3, ?4, ?5)"))
            .map_err(db_error)?;
        for record in dataset {
            insert
                .execute(params![
                    record.name,
                    record.market_cap_usd_billion,
                    record.market_cap_gbp_billion,
                    record.market_cap_eur_billion,
                    record.market_cap_inr_billion,
                ])
                .map_err(db_error)?;
        }
    }
    tx.commit().map_err(db_error)?;

    debug!("Loaded {} records into table {}", dataset.len(), table_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(name: &str, usd: f64) -> EnrichedBankRecord {
        EnrichedBankRecord {
            name: name.to_string(),
            market_cap_usd_billion: usd,
            market_cap_gbp_billion: usd * 0.5,
            market_cap_eur_billion: usd * 0.25,
            market_cap_inr_billion: usd * 2.0,
        }
    }

    fn table_rows(db: &Database, table: &str) -> Vec<(String, f64)> {
        let conn = db.connection().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT Name, MC_USD_Billion FROM {table}"))
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        rows
    }

    #[test]
    fn test_save_csv_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        let dataset = vec![EnrichedBankRecord {
            name: "Global Bank".to_string(),
            market_cap_usd_billion: 2500.75,
            market_cap_gbp_billion: 2000.6,
            market_cap_eur_billion: 2250.68,
            market_cap_inr_billion: 207562.25,
        }];

        save_csv(&dataset, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n\
             Global Bank,2500.75,2000.6,2250.68,207562.25\n"
        );
    }

    #[test]
    fn test_save_csv_quotes_names_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");

        save_csv(&[record("Bank, Holdings", 2.0)], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Bank, Holdings\",2.0,1.0,0.5,4.0"), "{content}");
    }

    #[test]
    fn test_save_csv_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        fs::write(&path, "stale content\nmore stale content\nand more\n").unwrap();

        save_csv(&[], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n"
        );
    }

    #[test]
    fn test_save_csv_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("banks.csv");

        let err = save_csv(&[record("A", 1.0)], &path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_save_table_writes_rows_in_order() {
        let mut db = Database::open_in_memory().unwrap();
        let dataset = vec![record("First", 3.0), record("Second", 2.0), record("Third", 1.0)];

        save_table(&dataset, &mut db, "Largest_banks").unwrap();

        assert_eq!(
            table_rows(&db, "Largest_banks"),
            vec![
                ("First".to_string(), 3.0),
                ("Second".to_string(), 2.0),
                ("Third".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn test_save_table_replaces_previous_rows() {
        let mut db = Database::open_in_memory().unwrap();

        save_table(&[record("Old A", 1.0), record("Old B", 2.0)], &mut db, "Largest_banks")
            .unwrap();
        save_table(&[record("New", 9.0)], &mut db, "Largest_banks").unwrap();

        assert_eq!(
            table_rows(&db, "Largest_banks"),
            vec![("New".to_string(), 9.0)]
        );
    }

    #[test]
    fn test_save_table_replaces_foreign_schema() {
        let mut db = Database::open_in_memory().unwrap();
        db.connection()
            .unwrap()
            .execute_batch("CREATE TABLE Largest_banks (id INTEGER); INSERT INTO Largest_banks VALUES (1);")
            .unwrap();

        save_table(&[record("Only", 1.0)], &mut db, "Largest_banks").unwrap();

        assert_eq!(table_rows(&db, "Largest_banks"), vec![("Only".to_string(), 1.0)]);
    }

    #[test]
    fn test_save_table_column_types() {
        let mut db = Database::open_in_memory().unwrap();
        save_table(&[record("A", 1.0)], &mut db, "Largest_banks").unwrap();

        let conn = db.connection().unwrap();
        let mut stmt = conn
            .prepare("SELECT name, type FROM pragma_table_info('Largest_banks')")
            .unwrap();
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            columns,
            vec![
                ("Name".to_string(), "TEXT".to_string()),
                ("MC_USD_Billion".to_string(), "REAL".to_string()),
                ("MC_GBP_Billion".to_string(), "REAL".to_string()),
                ("MC_EUR_Billion".to_string(), "REAL".to_string()),
                ("MC_INR_Billion".to_string(), "REAL".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_table_on_closed_connection() {
        let mut db = Database::open_in_memory().unwrap();
        db.close().unwrap();

        let err = save_table(&[record("A", 1.0)], &mut db, "Largest_banks").unwrap_err();
        assert_eq!(err.cause, "Database connection is closed");
    }
}
