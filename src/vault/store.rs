//! The capability shared by hub, link and satellite tables

use tracing::debug;

use crate::db::{Row, VaultConnection};

use super::error::{SaveOutcome, VaultError, VaultResult};
use super::ident::Ident;
use super::query::Statement;

/// Persistence for one kind of vault entity
///
/// Every call takes the connection to run on; stores keep no connection state.
pub trait EntityStore {
    type Entity;
    type Key<'k>;

    fn exists<C: VaultConnection + ?Sized>(&self, conn: &C, key: Self::Key<'_>)
        -> VaultResult<bool>;

    /// Write `entity` unless its key is already present
    fn save<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        entity: &Self::Entity,
    ) -> VaultResult<SaveOutcome>;

    fn get<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        key: Self::Key<'_>,
    ) -> VaultResult<Self::Entity>;

    /// Remove matching rows, returning how many went
    fn delete<C: VaultConnection + ?Sized>(
        &self,
        conn: &C,
        key: Self::Key<'_>,
    ) -> VaultResult<usize>;
}

pub(crate) fn run_select<C: VaultConnection + ?Sized>(
    conn: &C,
    table: &Ident,
    op: &'static str,
    stmt: &Statement,
) -> VaultResult<Vec<Row>> {
    let rows = conn
        .select(stmt.sql(), stmt.params())
        .map_err(VaultError::Backend)?;
    debug!(table = table.as_str(), op, rows = rows.len(), "select");
    Ok(rows)
}

pub(crate) fn run_execute<C: VaultConnection + ?Sized>(
    conn: &C,
    table: &Ident,
    op: &'static str,
    stmt: &Statement,
) -> VaultResult<usize> {
    let affected = conn
        .execute(stmt.sql(), stmt.params())
        .map_err(VaultError::Backend)?;
    debug!(table = table.as_str(), op, affected, "execute");
    Ok(affected)
}

/// Parse configured names and reject layouts whose columns overlap
///
/// Reconstruction tells fixed columns from mapped ones by name, so every
/// physical column has to be distinct.
pub(crate) fn idents<'a>(
    table: &str,
    fixed: impl IntoIterator<Item = &'a str>,
    mapped: impl IntoIterator<Item = &'a str>,
) -> VaultResult<(Ident, Vec<Ident>, Vec<Ident>)> {
    let table = Ident::new(table)?;
    let fixed = fixed
        .into_iter()
        .map(Ident::new)
        .collect::<VaultResult<Vec<_>>>()?;
    let mapped = mapped
        .into_iter()
        .map(Ident::new)
        .collect::<VaultResult<Vec<_>>>()?;

    let mut seen = std::collections::BTreeSet::new();
    for column in fixed.iter().chain(mapped.iter()) {
        if !seen.insert(column.as_str()) {
            return Err(VaultError::Config(format!(
                "column {} is used more than once in table {}",
                column.as_str(),
                table.as_str()
            )));
        }
    }

    Ok((table, fixed, mapped))
}
