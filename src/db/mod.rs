//! Backing store access
//!
//! A thin SQLite layer: the `VaultConnection` trait that entity stores run
//! their statements through, plus the concrete handles that implement it.
//!
//! # Example
//! ```no_run
//! use datavault::db::{SqliteDatabase, Value, VaultConnection};
//!
//! let db = SqliteDatabase::open("vault.db")?;
//! db.execute("DELETE FROM hub_customer WHERE hub_hash = ?", &[Value::from("H1")])?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backend;
pub mod config;
pub mod connection;
pub mod sqlite;
pub mod value;

pub use backend::DatabaseBackend;
pub use config::{BackendType, ConnectionConfig};
pub use connection::{Row, VaultConnection};
pub use sqlite::SqliteDatabase;
pub use value::Value;
