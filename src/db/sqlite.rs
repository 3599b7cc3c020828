//! SQLite database wrapper
//!
//! Owns one `rusqlite::Connection` and exposes it as a `VaultConnection`.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use super::connection::{Row, VaultConnection};
use super::value::Value;

/// How long a writer waits on a locked database before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database handle
#[derive(Debug)]
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Open or create a SQLite database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open a database file with an explicit busy timeout
    ///
    /// Concurrent dedup inserts against one file serialize on SQLite's write
    /// lock; the timeout bounds how long each of them waits for it.
    pub fn open_with_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).with_context(|| {
            format!("Failed to open SQLite database at {}", path.as_ref().display())
        })?;
        conn.busy_timeout(busy_timeout)
            .context("Failed to set busy timeout")?;

        Ok(Self { conn })
    }

    /// Create an in-memory database for testing
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        Ok(Self { conn })
    }

    /// Execute a batch of SQL statements
    ///
    /// Stores never issue DDL; this is for callers provisioning tables.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .context("Failed to execute batch")?;
        Ok(())
    }

    /// Get backend name
    pub fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Get reference to underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get mutable reference to underlying connection (for transactions)
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl VaultConnection for SqliteDatabase {
    fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.conn.select(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        VaultConnection::execute(&self.conn, sql, params)
    }
}
