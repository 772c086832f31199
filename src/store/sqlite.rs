use crate::core::{IoError, QueryError};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single SQLite connection held open for the duration of a run.
///
/// Once closed, every further operation reports the connection as closed.
pub struct Database {
    conn: Option<Connection>,
    path: PathBuf,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|e| IoError::new(&path, e))?;
        debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    pub fn open_in_memory() -> Result<Self, IoError> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|e| IoError::new(&path, e))?;
        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub(crate) fn connection(&self) -> Result<&Connection, QueryError> {
        self.conn.as_ref().ok_or(QueryError::ConnectionClosed)
    }

    pub(crate) fn connection_mut(&mut self) -> Result<&mut Connection, IoError> {
        let path = &self.path;
        self.conn
            .as_mut()
            .ok_or_else(|| IoError::new(path, QueryError::ConnectionClosed))
    }

    /// Closes the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), IoError> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| IoError::new(&self.path, e))?;
            debug!("Closed database at {}", self.path.display());
        }
        Ok(())
    }
}

/// Quotes `name` as an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.db");

        let mut db = Database::open(&path).unwrap();
        assert!(db.is_open());
        assert_eq!(db.path(), path.as_path());

        db.close().unwrap();
        assert!(!db.is_open());
        assert!(path.exists());

        // Second close is a no-op
        db.close().unwrap();
    }

    #[test]
    fn test_closed_connection_is_reported() {
        let mut db = Database::open_in_memory().unwrap();
        db.close().unwrap();

        assert!(matches!(db.connection(), Err(QueryError::ConnectionClosed)));
        let err = db.connection_mut().unwrap_err();
        assert_eq!(err.cause, "Database connection is closed");
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("banks.db");

        let err = Database::open(&path).err().unwrap();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Largest_banks"), "\"Largest_banks\"");
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }
}
