//! Read-only queries against the database sink.

use crate::core::QueryError;
use crate::store::Database;
use rusqlite::Batch;
use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::types::ValueRef;
use std::fmt::Display;
use tracing::debug;

/// A single column value returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl QueryValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Integer(v) => Some(*v as f64),
            QueryValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl Display for QueryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryValue::Null => write!(f, "NULL"),
            QueryValue::Integer(v) => write!(f, "{v}"),
            QueryValue::Real(v) => write!(f, "{v}"),
            QueryValue::Text(v) => write!(f, "{v}"),
            QueryValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<ValueRef<'_>> for QueryValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => QueryValue::Null,
            ValueRef::Integer(v) => QueryValue::Integer(v),
            ValueRef::Real(v) => QueryValue::Real(v),
            ValueRef::Text(v) => QueryValue::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => QueryValue::Blob(v.to_vec()),
        }
    }
}

/// Rows returned by a query, in the order the database produced them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<QueryValue>>,
}

impl ResultSet {
    /// Values of the column at `index`, top to bottom.
    pub fn column(&self, index: usize) -> Vec<&QueryValue> {
        self.rows.iter().filter_map(|row| row.get(index)).collect()
    }
}

/// Executes a single read-only statement and collects every row.
///
/// Only statements that return rows are accepted; `ATTACH`, `BEGIN` and
/// pragma assignments are refused even though SQLite reports them as
/// read-only.
pub fn run_query(sql: &str, db: &Database) -> Result<ResultSet, QueryError> {
    let conn = db.connection()?;
    debug!("Running query: {}", sql);

    let syntax_error = |e: rusqlite::Error| QueryError::Syntax(e.to_string());
    let mut batch = Batch::new(conn, sql);
    let mut stmt = batch
        .next()
        .map_err(syntax_error)?
        .ok_or_else(|| QueryError::Syntax("empty statement".to_string()))?;
    if batch.next().map_err(syntax_error)?.is_some() {
        return Err(QueryError::Syntax(
            "only one statement can be run at a time".to_string(),
        ));
    }
    if !stmt.readonly() || stmt.column_count() == 0 {
        return Err(QueryError::NotReadOnly(sql.to_string()));
    }

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt
        .query([])
        .map_err(|e| QueryError::Execution(e.to_string()))?;
    while let Some(row) = cursor
        .next()
        .map_err(|e| QueryError::Execution(e.to_string()))?
    {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value = row
                .get_ref(index)
                .map_err(|e| QueryError::Execution(e.to_string()))?;
            values.push(QueryValue::from(value));
        }
        rows.push(values);
    }

    debug!("Query returned {} rows", rows.len());
    Ok(ResultSet { columns, rows })
}
