//! The backing connection contract consumed by every entity store
//!
//! A connection is an already-bound handle: stores receive it as an argument
//! on every call and never look one up or remember which one was used last.

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, Connection};

use super::value::Value;

/// One result row: column names in select order, paired with their values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Look up a column by exact name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// A relational handle that can run parameterized statements
///
/// `?` placeholders in `sql` are bound positionally from `params`.
pub trait VaultConnection {
    /// Run a query and collect every returned row
    fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Run a statement and report how many rows it changed
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize>;
}

impl VaultConnection for Connection {
    fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = self
            .prepare_cached(sql)
            .with_context(|| format!("Failed to prepare: {}", sql))?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut values = Vec::with_capacity(columns.len());
                for (i, name) in columns.iter().enumerate() {
                    values.push((name.clone(), Value::from(row.get_ref(i)?)));
                }
                Ok(Row::new(values))
            })
            .with_context(|| format!("Failed to query: {}", sql))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read rows: {}", sql))?;

        Ok(rows)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        let count = self
            .prepare_cached(sql)
            .with_context(|| format!("Failed to prepare: {}", sql))?
            .execute(params_from_iter(params.iter()))
            .with_context(|| format!("Failed to execute: {}", sql))?;
        Ok(count)
    }
}
