//! Link tables: relationships between hubs
//!
//! Each role in a link is stored in its own column, chosen through the store's
//! field map. Roles the map doesn't know are dropped on write, and columns the
//! map doesn't know are ignored on read.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::db::{Row, Value, VaultConnection};

use super::error::{SaveOutcome, VaultError, VaultResult};
use super::field_map::{fold, FieldMap};
use super::ident::Ident;
use super::load_date::{self, LoadDatePrecision};
use super::model::Link;
use super::query::{KeyFilter, QueryBuilder};
use super::store::{idents, run_execute, run_select, EntityStore};

/// Physical layout of a link table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkLayout {
    pub table: String,
    pub source_column: String,
    pub load_date_column: String,
    pub hash_key_column: String,
    /// Role name to the column holding that hub's hash key
    pub field_map: FieldMap,
}

/// Reads and writes links in one table
#[derive(Debug, Clone)]
pub struct LinkStore {
    table: Ident,
    source: Ident,
    load_date: Ident,
    hash_key: Ident,
    field_map: FieldMap,
    /// Role columns, parallel to `field_map.iter()`
    roles: Vec<Ident>,
    precision: LoadDatePrecision,
}

impl LinkStore {
    pub fn new(layout: &LinkLayout, precision: LoadDatePrecision) -> VaultResult<Self> {
        let (table, fixed, roles) = idents(
            &layout.table,
            [
                layout.source_column.as_str(),
                layout.load_date_column.as_str(),
                layout.hash_key_column.as_str(),
            ],
            layout.field_map.columns(),
        )?;
        if roles.is_empty() {
            return Err(VaultError::Config(format!(
                "link table {} has no role columns",
                table.as_str()
            )));
        }
        let [source, load_date, hash_key]: [Ident; 3] = fixed
            .try_into()
            .map_err(|_| VaultError::Config("link layout needs three columns".to_string()))?;

        Ok(Self {
            table,
            source,
            load_date,
            hash_key,
            field_map: layout.field_map.clone(),
            roles,
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

    fn reconstruct(&self, hash_key: &str, row: Row) -> VaultResult<Link> {
        let mut source = None;
        let mut loaded_at = None;
        let mut links = BTreeMap::new();

        for (column, value) in row {
            if column == self.source.as_str() {
                source = value.into_text().filter(|s| !s.is_empty());
                continue;
            }
            if column == self.load_date.as_str() {
                loaded_at = load_date::parse(&value);
                continue;
            }
            let Some(role) = self.field_map.reverse_resolve(&column) else {
                continue;
            };
            match value {
                Value::Null => {}
                Value::Text(hub_hash) => {
                    links.insert(role.to_string(), hub_hash);
                }
                other => {
                    return Err(self.malformed(
                        hash_key,
                        &format!("role {role} holds a non-text value ({other})"),
                    ))
                }
            }
        }

        let source = source.ok_or_else(|| self.malformed(hash_key, "source is empty"))?;
        let loaded_at = loaded_at
            .ok_or_else(|| self.malformed(hash_key, "load date is missing or unparseable"))?;
        if links.is_empty() {
            return Err(self.malformed(hash_key, "no role column is populated"));
        }

        Ok(Link::with_load_date(source, loaded_at, hash_key, links))
    }

    fn malformed(&self, hash_key: &str, reason: &str) -> VaultError {
        tracing::warn!(table = self.table(), hash_key, reason, "malformed link row");
        VaultError::malformed(self.table(), format!("{hash_key}: {reason}"))
    }
}

impl EntityStore for LinkStore {
    type Entity = Link;
    type Key<'k> = &'k str;

    fn exists<C: VaultConnection + ?Sized>(&self, conn: &C, hash_key: &str) -> VaultResult<bool> {
        let stmt = self
            .builder()
            .exists(&KeyFilter::eq(&self.hash_key, hash_key));
        Ok(!run_select(conn, &self.table, "exists", &stmt)?.is_empty())
    }

    fn save<C: VaultConnection + ?Sized>(&self, conn: &C, link: &Link) -> VaultResult<SaveOutcome> {
        let hubs: BTreeMap<String, &str> = link
            .links()
            .iter()
            .map(|(role, hub_hash)| (fold(role), hub_hash.as_str()))
            .collect();

        let mut columns: Vec<(&Ident, Value)> = vec![
            (&self.hash_key, link.hash_key().into()),
            (&self.load_date, self.precision.stamp_now().into()),
            (&self.source, link.source().into()),
        ];
        let fixed = columns.len();
        for ((role, _), column) in self.field_map.iter().zip(&self.roles) {
            if let Some(hub_hash) = hubs.get(role) {
                columns.push((column, (*hub_hash).into()));
            }
        }
        if columns.len() == fixed {
            return Err(VaultError::unmapped(self.table(), link.hash_key()));
        }

        let stmt = self
            .builder()
            .insert_absent(&columns, &KeyFilter::eq(&self.hash_key, link.hash_key()));
        let affected = run_execute(conn, &self.table, "save", &stmt)?;
        Ok(SaveOutcome::from_affected(affected))
    }

    fn get<C: VaultConnection + ?Sized>(&self, conn: &C, hash_key: &str) -> VaultResult<Link> {
        let mut columns = vec![&self.source, &self.load_date, &self.hash_key];
        columns.extend(self.roles.iter());

        let stmt = self.builder().select_one(
            &columns,
            &KeyFilter::eq(&self.hash_key, hash_key),
            None,
        );
        let row = run_select(conn, &self.table, "get", &stmt)?
            .into_iter()
            .next()
            .ok_or_else(|| VaultError::not_found(self.table(), hash_key))?;
        self.reconstruct(hash_key, row)
    }

    fn delete<C: VaultConnection + ?Sized>(&self, conn: &C, hash_key: &str) -> VaultResult<usize> {
        let stmt = self
            .builder()
            .delete(&KeyFilter::eq(&self.hash_key, hash_key));
        run_execute(conn, &self.table, "delete", &stmt)
    }
}
