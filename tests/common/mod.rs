//! Shared fixtures: a file-backed vault with one table of each kind

#![allow(dead_code)]

use anyhow::Result;
use datavault::db::SqliteDatabase;
use datavault::vault::{HubLayout, LinkLayout, SatelliteLayout};
use datavault::FieldMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHEMA: &str = "
    CREATE TABLE hub_customer (
        hub_hash TEXT NOT NULL,
        customer_id TEXT NOT NULL,
        record_source TEXT NOT NULL,
        load_date TEXT NOT NULL
    );
    CREATE TABLE link_family (
        link_hash TEXT NOT NULL,
        record_source TEXT NOT NULL,
        load_date TEXT NOT NULL,
        col_p TEXT,
        col_c TEXT
    );
    CREATE TABLE sat_customer (
        hash_diff TEXT NOT NULL,
        hub_hash TEXT NOT NULL,
        record_source TEXT NOT NULL,
        load_date TEXT NOT NULL,
        full_name TEXT,
        city TEXT
    );
";

/// A temporary database file with the fixture schema applied
pub struct Vault {
    dir: TempDir,
    pub path: PathBuf,
}

impl Vault {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vault.db");
        SqliteDatabase::open(&path)?.execute_batch(SCHEMA)?;
        Ok(Self { dir, path })
    }

    pub fn open(&self) -> Result<SqliteDatabase> {
        SqliteDatabase::open(&self.path)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Rows in `table` where `column` equals `value`
pub fn count_rows(db: &SqliteDatabase, table: &str, column: &str, value: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", table, column);
    Ok(db
        .connection()
        .query_row(&sql, [value], |row| row.get(0))?)
}

pub fn hub_layout() -> HubLayout {
    HubLayout {
        table: "hub_customer".to_string(),
        data_column: "customer_id".to_string(),
        source_column: "record_source".to_string(),
        load_date_column: "load_date".to_string(),
        hash_key_column: "hub_hash".to_string(),
    }
}

pub fn link_layout() -> LinkLayout {
    LinkLayout {
        table: "link_family".to_string(),
        source_column: "record_source".to_string(),
        load_date_column: "load_date".to_string(),
        hash_key_column: "link_hash".to_string(),
        field_map: FieldMap::build([("parent", "col_p"), ("child", "col_c")]),
    }
}

pub fn satellite_layout() -> SatelliteLayout {
    SatelliteLayout {
        table: "sat_customer".to_string(),
        source_column: "record_source".to_string(),
        load_date_column: "load_date".to_string(),
        hash_diff_column: "hash_diff".to_string(),
        hub_hash_column: "hub_hash".to_string(),
        field_map: FieldMap::build([("Name", "full_name"), ("City", "city")]),
    }
}
