//! Satellite tables: descriptive attributes hung off a hub
//!
//! A satellite row is identified by its hash diff together with the hash of
//! the hub it describes. The same hash diff can appear under many hubs, so
//! lookups may narrow on the hub hash or leave it out.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::db::{Row, Value, VaultConnection};

use super::error::{SaveOutcome, VaultError, VaultResult};
use super::field_map::{fold, FieldMap};
use super::ident::Ident;
use super::load_date::{self, LoadDatePrecision};
use super::model::Satellite;
use super::query::{KeyFilter, QueryBuilder};
use super::store::{idents, run_execute, run_select, EntityStore};

/// Physical layout of a satellite table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SatelliteLayout {
    pub table: String,
    pub source_column: String,
    pub load_date_column: String,
    pub hash_diff_column: String,
    pub hub_hash_column: String,
    /// Attribute name to column
    #[serde(default)]
    pub field_map: FieldMap,
}

/// Lookup key for satellite rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteKey<'k> {
    pub hash_diff: &'k str,
    /// When absent, any row with `hash_diff` matches
    pub hub_hash: Option<&'k str>,
}

impl<'k> SatelliteKey<'k> {
    pub fn new(hash_diff: &'k str) -> Self {
        Self {
            hash_diff,
            hub_hash: None,
        }
    }

    pub fn under(hash_diff: &'k str, hub_hash: &'k str) -> Self {
        Self {
            hash_diff,
            hub_hash: Some(hub_hash),
        }
    }

    fn describe(&self) -> String {
        match self.hub_hash {
            Some(hub_hash) => format!("{} under hub {}", self.hash_diff, hub_hash),
            None => self.hash_diff.to_string(),
        }
    }
}

impl<'k> From<&'k str> for SatelliteKey<'k> {
    fn from(hash_diff: &'k str) -> Self {
        Self::new(hash_diff)
    }
}

impl<'k> From<&'k Satellite> for SatelliteKey<'k> {
    fn from(sat: &'k Satellite) -> Self {
        Self::under(sat.hash_diff(), sat.hub_hash())
    }
}

/// Reads and writes satellites in one table
#[derive(Debug, Clone)]
pub struct SatelliteStore {
    table: Ident,
    source: Ident,
    load_date: Ident,
    hash_diff: Ident,
    hub_hash: Ident,
    field_map: FieldMap,
    /// Attribute columns, parallel to `field_map.iter()`
    fields: Vec<Ident>,
    precision: LoadDatePrecision,
}

impl SatelliteStore {
    pub fn new(layout: &SatelliteLayout, precision: LoadDatePrecision) -> VaultResult<Self> {
        let (table, fixed, fields) = idents(
            &layout.table,
            [
                layout.source_column.as_str(),
                layout.load_date_column.as_str(),
                layout.hash_diff_column.as_str(),
                layout.hub_hash_column.as_str(),
            ],
            layout.field_map.columns(),
        )?;
        let [source, load_date, hash_diff, hub_hash]: [Ident; 4] = fixed
            .try_into()
            .map_err(|_| VaultError::Config("satellite layout needs four columns".to_string()))?;

        Ok(Self {
            table,
            source,
            load_date,
            hash_diff,
            hub_hash,
            field_map: layout.field_map.clone(),
            fields,
            precision,
        })
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    fn builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.table)
    }

    fn filter<'a>(&'a self, key: &SatelliteKey<'_>) -> KeyFilter<'a> {
        KeyFilter::eq(&self.hash_diff, key.hash_diff).and_maybe(&self.hub_hash, key.hub_hash)
    }

    fn reconstruct(&self, hash_diff: &str, row: Row) -> VaultResult<Satellite> {
        let mut source = None;
        let mut loaded_at = None;
        let mut hub_hash = None;
        let mut data = BTreeMap::new();

        for (column, value) in row {
            if column == self.source.as_str() {
                source = value.into_text().filter(|s| !s.is_empty());
                continue;
            }
            if column == self.load_date.as_str() {
                loaded_at = load_date::parse(&value);
                continue;
            }
            if column == self.hub_hash.as_str() {
                hub_hash = value.into_text().filter(|s| !s.is_empty());
                continue;
            }
            let Some(field) = self.field_map.reverse_resolve(&column) else {
                continue;
            };
            if !value.is_null() {
                data.insert(field.to_string(), value);
            }
        }

        let source = source.ok_or_else(|| self.malformed(hash_diff, "source is empty"))?;
        let loaded_at = loaded_at
            .ok_or_else(|| self.malformed(hash_diff, "load date is missing or unparseable"))?;
        let hub_hash = hub_hash.ok_or_else(|| self.malformed(hash_diff, "hub hash is empty"))?;
        if data.is_empty() {
            return Err(self.malformed(hash_diff, "no attribute column is populated"));
        }

        Ok(Satellite::with_load_date(
            source, loaded_at, hash_diff, hub_hash, data,
        ))
    }

    fn malformed(&self, hash_diff: &str, reason: &str) -> VaultError {
        tracing::warn!(table = self.table(), hash_diff, reason, "malformed satellite row");
        VaultError::malformed(self.table(), format!("{hash_diff}: {reason}"))
    }
}

impl EntityStore for SatelliteStore {
    type Entity = Satellite;
    type Key<'k> = SatelliteKey<'k>;

    fn exists<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        key: SatelliteKey<'_>,
    ) -> VaultResult<bool> {
        let stmt = self.builder().exists(&self.filter(&key));
        Ok(!run_select(conn, &self.table, "exists", &stmt)?.is_empty())
    }

    /// Dedup is scoped to the exact (hash diff, hub hash) pair
    fn save<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        sat: &Satellite,
    ) -> VaultResult<SaveOutcome> {
        let attributes: BTreeMap<String, &Value> = sat
            .data()
            .iter()
            .map(|(field, value)| (fold(field), value))
            .collect();

        let mut columns: Vec<(&Ident, Value)> = vec![
            (&self.hash_diff, sat.hash_diff().into()),
            (&self.hub_hash, sat.hub_hash().into()),
            (&self.source, sat.source().into()),
            (&self.load_date, self.precision.stamp_now().into()),
        ];
        let fixed = columns.len();
        for ((field, _), column) in self.field_map.iter().zip(&self.fields) {
            if let Some(value) = attributes.get(field).filter(|v| !v.is_null()) {
                columns.push((column, (*value).clone()));
            }
        }
        if columns.len() == fixed {
            return Err(VaultError::unmapped(
                self.table(),
                SatelliteKey::from(sat).describe(),
            ));
        }

        let guard = self.filter(&SatelliteKey::from(sat));
        let stmt = self.builder().insert_absent(&columns, &guard);
        let affected = run_execute(conn, &self.table, "save", &stmt)?;
        Ok(SaveOutcome::from_affected(affected))
    }

    /// Without a hub hash, the most recently loaded matching row wins
    fn get<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        key: SatelliteKey<'_>,
    ) -> VaultResult<Satellite> {
        let mut columns = vec![&self.source, &self.load_date, &self.hub_hash];
        columns.extend(self.fields.iter());

        let stmt = self
            .builder()
            .select_one(&columns, &self.filter(&key), Some(&self.load_date));
        let row = run_select(conn, &self.table, "get", &stmt)?
            .into_iter()
            .next()
            .ok_or_else(|| VaultError::not_found(self.table(), key.describe()))?;
        self.reconstruct(key.hash_diff, row)
    }

    /// Without a hub hash, every row with the hash diff is removed
    fn delete<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        key: SatelliteKey<'_>,
    ) -> VaultResult<usize> {
        let stmt = self.builder().delete(&self.filter(&key));
        run_execute(conn, &self.table, "delete", &stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteDatabase;
    use anyhow::Result;

    fn layout() -> SatelliteLayout {
        SatelliteLayout {
            table: "sat_customer".to_string(),
            source_column: "record_source".to_string(),
            load_date_column: "load_date".to_string(),
            hash_diff_column: "hash_diff".to_string(),
            hub_hash_column: "hub_hash".to_string(),
            field_map: FieldMap::build([("Name", "full_name"), ("age", "age_years")]),
        }
    }

    fn setup() -> Result<(SqliteDatabase, SatelliteStore)> {
        let db = SqliteDatabase::open_in_memory()?;
        db.execute_batch(
            "CREATE TABLE sat_customer (
                hash_diff TEXT NOT NULL,
                hub_hash TEXT NOT NULL,
                record_source TEXT NOT NULL,
                load_date TEXT NOT NULL,
                full_name TEXT,
                age_years INTEGER
            )",
        )?;
        let store = SatelliteStore::new(&layout(), LoadDatePrecision::Milliseconds)?;
        Ok((db, store))
    }

    #[test]
    fn test_round_trip_keeps_value_types() -> Result<()> {
        let (db, store) = setup()?;
        let sat = Satellite::new(
            "crm",
            "D1",
            "H1",
            [("Name", Value::from("Ada")), ("AGE", Value::Integer(36))],
        );
        assert_eq!(store.save(&db, &sat)?, SaveOutcome::Inserted);

        let loaded = store.get(&db, SatelliteKey::under("D1", "H1"))?;
        assert_eq!(loaded.get("name"), Some(&Value::from("Ada")));
        assert_eq!(loaded.get("age"), Some(&Value::Integer(36)));
        assert_eq!(loaded.hub_hash(), "H1");
        assert_eq!(loaded.source(), "crm");
        Ok(())
    }

    #[test]
    fn test_same_diff_under_two_hubs() -> Result<()> {
        let (db, store) = setup()?;
        let data = [("name", "Ada")];
        assert!(store.save(&db, &Satellite::new("crm", "D1", "H1", data))?.was_inserted());
        assert!(store.save(&db, &Satellite::new("crm", "D1", "H2", data))?.was_inserted());
        assert_eq!(
            store.save(&db, &Satellite::new("crm", "D1", "H2", data))?,
            SaveOutcome::AlreadyPresent
        );

        assert!(store.exists(&db, SatelliteKey::new("D1"))?);
        assert!(store.exists(&db, SatelliteKey::under("D1", "H2"))?);
        assert!(!store.exists(&db, SatelliteKey::under("D1", "H3"))?);
        Ok(())
    }

    #[test]
    fn test_delete_narrowed_and_broad() -> Result<()> {
        let (db, store) = setup()?;
        for hub in ["H1", "H2", "H3"] {
            store.save(&db, &Satellite::new("crm", "D1", hub, [("name", "Ada")]))?;
        }

        assert_eq!(store.delete(&db, SatelliteKey::under("D1", "H1"))?, 1);
        assert!(!store.exists(&db, SatelliteKey::under("D1", "H1"))?);
        assert!(store.exists(&db, "D1".into())?);

        assert_eq!(store.delete(&db, "D1".into())?, 2);
        assert!(!store.exists(&db, "D1".into())?);
        Ok(())
    }

    #[test]
    fn test_get_without_hub_prefers_newest() -> Result<()> {
        let (db, store) = setup()?;
        db.execute_batch(
            "INSERT INTO sat_customer VALUES ('D1', 'H1', 'crm', '2024-01-01 00:00:00.000', 'Old', NULL);
             INSERT INTO sat_customer VALUES ('D1', 'H2', 'crm', '2024-06-01 00:00:00.000', 'New', NULL);",
        )?;

        let loaded = store.get(&db, "D1".into())?;
        assert_eq!(loaded.hub_hash(), "H2");
        assert_eq!(loaded.get("name"), Some(&Value::from("New")));
        assert_eq!(loaded.get("age"), None);
        Ok(())
    }

    #[test]
    fn test_unpopulated_row_is_malformed() -> Result<()> {
        let (db, store) = setup()?;
        db.execute_batch(
            "INSERT INTO sat_customer VALUES ('D2', 'H1', 'crm', '2024-01-01 00:00:00', NULL, NULL)",
        )?;

        assert!(store.get(&db, "D2".into()).unwrap_err().is_malformed());
        assert!(store.get(&db, "D3".into()).unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_get_under_hub_ignores_other_hubs() -> Result<()> {
        let (db, store) = setup()?;
        store.save(&db, &Satellite::new("crm", "D1", "H1", [("name", "A")]))?;
        store.save(&db, &Satellite::new("crm", "D1", "H2", [("name", "B")]))?;

        let first = store.get(&db, SatelliteKey::under("D1", "H1"))?;
        assert_eq!(first.hub_hash(), "H1");
        assert_eq!(first.get("name"), Some(&Value::from("A")));

        let second = store.get(&db, SatelliteKey::under("D1", "H2"))?;
        assert_eq!(second.hub_hash(), "H2");
        assert_eq!(second.get("name"), Some(&Value::from("B")));
        Ok(())
    }

    #[test]
    fn test_save_without_mapped_attribute_writes_nothing() -> Result<()> {
        let (db, store) = setup()?;

        let unmapped = Satellite::new("crm", "D4", "H1", [("shoe_size", Value::Integer(43))]);
        assert!(store.save(&db, &unmapped).unwrap_err().is_unmapped());

        let only_null = Satellite::new("crm", "D4", "H1", [("name", Value::Null)]);
        assert!(store.save(&db, &only_null).unwrap_err().is_unmapped());
        assert!(!store.exists(&db, SatelliteKey::under("D4", "H1"))?);

        let valid = Satellite::new("crm", "D4", "H1", [("name", "Ada")]);
        assert_eq!(store.save(&db, &valid)?, SaveOutcome::Inserted);
        assert_eq!(
            store.get(&db, SatelliteKey::under("D4", "H1"))?.get("name"),
            Some(&Value::from("Ada"))
        );
        Ok(())
    }

    #[test]
    fn test_not_found_names_hub() -> Result<()> {
        let (db, store) = setup()?;
        let err = store.get(&db, SatelliteKey::under("D1", "H7")).unwrap_err();
        assert!(err.to_string().contains("D1 under hub H7"));
        Ok(())
    }
}
