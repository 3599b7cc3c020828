//! Hub tables: one row per business key

use serde::Deserialize;

use crate::db::{Row, Value, VaultConnection};

use super::error::{SaveOutcome, VaultError, VaultResult};
use super::ident::Ident;
use super::load_date::{self, LoadDatePrecision};
use super::model::Hub;
use super::query::{KeyFilter, QueryBuilder};
use super::store::{idents, run_execute, run_select, EntityStore};

/// Physical layout of a hub table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HubLayout {
    pub table: String,
    pub data_column: String,
    pub source_column: String,
    pub load_date_column: String,
    pub hash_key_column: String,
}

/// Reads and writes hubs in one table
#[derive(Debug, Clone)]
pub struct HubStore {
    table: Ident,
    data: Ident,
    source: Ident,
    load_date: Ident,
    hash_key: Ident,
    precision: LoadDatePrecision,
}

impl HubStore {
    pub fn new(layout: &HubLayout, precision: LoadDatePrecision) -> VaultResult<Self> {
        let (table, fixed, _) = idents(
            &layout.table,
            [
                layout.data_column.as_str(),
                layout.source_column.as_str(),
                layout.load_date_column.as_str(),
                layout.hash_key_column.as_str(),
            ],
            std::iter::empty::<&str>(),
        )?;
        let [data, source, load_date, hash_key]: [Ident; 4] = fixed
            .try_into()
            .map_err(|_| VaultError::Config("hub layout needs four columns".to_string()))?;

        Ok(Self {
            table,
            data,
            source,
            load_date,
            hash_key,
            precision,
        })
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    fn builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.table)
    }

    fn reconstruct(&self, hash_key: &str, row: &Row) -> VaultResult<Hub> {
        let data = row
            .get(self.data.as_str())
            .and_then(Value::as_text)
            .ok_or_else(|| self.malformed(hash_key, "data column is empty or not text"))?;
        let source = row
            .get(self.source.as_str())
            .and_then(Value::as_text)
            .ok_or_else(|| self.malformed(hash_key, "source column is empty or not text"))?;
        let load_date = row
            .get(self.load_date.as_str())
            .and_then(load_date::parse)
            .ok_or_else(|| self.malformed(hash_key, "load date is missing or unparseable"))?;

        Ok(Hub::with_load_date(source, load_date, data, hash_key))
    }

    fn malformed(&self, hash_key: &str, reason: &str) -> VaultError {
        tracing::warn!(table = self.table(), hash_key, reason, "malformed hub row");
        VaultError::malformed(self.table(), format!("{hash_key}: {reason}"))
    }
}

impl EntityStore for HubStore {
    type Entity = Hub;
    type Key<'k> = &'k str;

    fn exists<C: VaultConnection + ?Sized>(&self, conn: &C, hash_key: &str) -> VaultResult<bool> {
        let stmt = self
            .builder()
            .exists(&KeyFilter::eq(&self.hash_key, hash_key));
        Ok(!run_select(conn, &self.table, "exists", &stmt)?.is_empty())
    }

    fn save<C: VaultConnection + ?Sized>(&self, conn: &C, hub: &Hub) -> VaultResult<SaveOutcome> {
        let stmt = self.builder().insert_absent(
            &[
                (&self.data, hub.data().into()),
                (&self.source, hub.source().into()),
                (&self.load_date, self.precision.stamp_now().into()),
                (&self.hash_key, hub.hash_key().into()),
            ],
            &KeyFilter::eq(&self.hash_key, hub.hash_key()),
        );
        let affected = run_execute(conn, &self.table, "save", &stmt)?;
        Ok(SaveOutcome::from_affected(affected))
    }

    fn get<C: VaultConnection + ?Sized>(&self, conn: &C, hash_key: &str) -> VaultResult<Hub> {
        let stmt = self.builder().select_one(
            &[&self.data, &self.source, &self.load_date],
            &KeyFilter::eq(&self.hash_key, hash_key),
            None,
        );
        let rows = run_select(conn, &self.table, "get", &stmt)?;
        let row = rows
            .first()
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
