//! Statement builder for entity tables
//!
//! Produces the four statement shapes every store needs: existence check,
//! dedup insert, single-row select and delete. Identifiers come from `Ident`
//! and are rendered quoted; every value becomes a bound `?` parameter.

use crate::db::Value;

use super::ident::Ident;

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Equality conditions joined with AND; never empty
#[derive(Debug, Clone)]
pub struct KeyFilter<'a> {
    terms: Vec<(&'a Ident, Value)>,
}

impl<'a> KeyFilter<'a> {
    pub fn eq(column: &'a Ident, value: impl Into<Value>) -> Self {
        Self {
            terms: vec![(column, value.into())],
        }
    }

    pub fn and(mut self, column: &'a Ident, value: impl Into<Value>) -> Self {
        self.terms.push((column, value.into()));
        self
    }

    /// Add a condition only when `value` is present
    pub fn and_maybe<V: Into<Value>>(self, column: &'a Ident, value: Option<V>) -> Self {
        match value {
            Some(value) => self.and(column, value),
            None => self,
        }
    }

    fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        sql.push_str(" WHERE ");
        for (i, (column, value)) in self.terms.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&format!("{column} = ?"));
            params.push(value.clone());
        }
    }
}

/// Builds statements against one table
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    table: &'a Ident,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(table: &'a Ident) -> Self {
        Self { table }
    }

    /// `SELECT 1 ... LIMIT 1`; any returned row means the key exists
    pub fn exists(&self, filter: &KeyFilter<'_>) -> Statement {
        let mut sql = format!("SELECT 1 FROM {}", self.table);
        let mut params = Vec::new();
        filter.render(&mut sql, &mut params);
        sql.push_str(" LIMIT 1");
        Statement { sql, params }
    }

    /// Insert `columns` unless a row matching `guard` already exists
    ///
    /// The guard and the insert are one statement, so the existence test and
    /// the write are atomic with respect to other writers of the same key.
    pub fn insert_absent(&self, columns: &[(&Ident, Value)], guard: &KeyFilter<'_>) -> Statement {
        let names = columns
            .iter()
            .map(|(column, _)| column.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");

        let mut sql = format!(
            "INSERT INTO {table} ({names}) SELECT {placeholders} WHERE NOT EXISTS (SELECT 1 FROM {table}",
            table = self.table,
        );
        let mut params: Vec<Value> = columns.iter().map(|(_, value)| value.clone()).collect();
        guard.render(&mut sql, &mut params);
        sql.push(')');

        Statement { sql, params }
    }

    /// Select `columns` from the first matching row
    ///
    /// With `newest_first`, rows are ordered by that column descending so the
    /// "first" row is well defined when several match.
    pub fn select_one(
        &self,
        columns: &[&Ident],
        filter: &KeyFilter<'_>,
        newest_first: Option<&Ident>,
    ) -> Statement {
        let names = columns
            .iter()
            .map(|column| column.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {names} FROM {}", self.table);
        let mut params = Vec::new();
        filter.render(&mut sql, &mut params);
        if let Some(order) = newest_first {
            sql.push_str(&format!(" ORDER BY {order} DESC"));
        }
        sql.push_str(" LIMIT 1");

        Statement { sql, params }
    }

    pub fn delete(&self, filter: &KeyFilter<'_>) -> Statement {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        filter.render(&mut sql, &mut params);
        Statement { sql, params }
    }
}
