//! The connection a configured table is opened on
//!
//! `[connections.<name>]` entries open into a `DatabaseBackend`, which the
//! stores accept like any other `VaultConnection`.

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use super::connection::{Row, VaultConnection};
use super::sqlite::SqliteDatabase;
use super::value::Value;

/// Database backend enum supporting multiple implementations
///
/// Each variant wraps a specific backend implementation.
#[derive(Debug)]
pub enum DatabaseBackend {
    /// Plain SQLite file or in-memory database
    Sqlite(SqliteDatabase),
}

impl DatabaseBackend {
    /// Open a SQLite database file
    pub fn open_sqlite<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        Ok(Self::Sqlite(SqliteDatabase::open_with_timeout(
            path,
            busy_timeout,
        )?))
    }

    /// Create an in-memory SQLite database for testing
    pub fn open_sqlite_in_memory() -> Result<Self> {
        Ok(Self::Sqlite(SqliteDatabase::open_in_memory()?))
    }

    /// Execute a batch of SQL statements
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.execute_batch(sql),
        }
    }

    /// Get backend name for debugging/logging
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(db) => db.backend_name(),
        }
    }

    /// Get reference to underlying connection
    pub fn connection(&self) -> &Connection {
        match self {
            Self::Sqlite(db) => db.connection(),
        }
    }
}

impl VaultConnection for DatabaseBackend {
    fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        match self {
            Self::Sqlite(db) => db.select(sql, params),
        }
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        match self {
            Self::Sqlite(db) => db.execute(sql, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_backend_creation() -> Result<()> {
        let db = DatabaseBackend::open_sqlite_in_memory()?;
        assert_eq!(db.backend_name(), "sqlite");
        assert!(db.connection().is_autocommit());
        Ok(())
    }

    #[test]
    fn test_backend_execute() -> Result<()> {
        let db = DatabaseBackend::open_sqlite_in_memory()?;

        db.execute_batch("CREATE TABLE test (id INTEGER, name TEXT)")?;

        let count = db.execute(
            "INSERT INTO test VALUES (?, ?)",
            &[Value::Integer(1), Value::from("test")],
        )?;
        assert_eq!(count, 1);

        let rows = db.select("SELECT name FROM test", &[])?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name").and_then(Value::as_text), Some("test"));

        Ok(())
    }
}
