//! Logical name to physical column mapping
//!
//! Logical names are case-folded on the way in; physical column names are kept
//! exactly as given.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Case-insensitive map from logical field or role names to column names
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct FieldMap {
    columns: BTreeMap<String, String>,
}

/// Canonical form of a logical name
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl FieldMap {
    /// Build from raw pairs; keys differing only by case collapse, last one wins
    pub fn build<I, K, V>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let columns = raw
            .into_iter()
            .map(|(logical, column)| (fold(logical.as_ref()), column.into()))
            .collect();
        Self { columns }
    }

    pub fn resolve(&self, logical: &str) -> Option<&str> {
        self.columns.get(&fold(logical)).map(String::as_str)
    }

    /// Find the logical name stored in `column`
    pub fn reverse_resolve(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, physical)| physical.as_str() == column)
            .map(|(logical, _)| logical.as_str())
    }

    /// Pairs in logical-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(logical, column)| (logical.as_str(), column.as_str()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<BTreeMap<String, String>> for FieldMap {
    fn from(raw: BTreeMap<String, String>) -> Self {
        Self::build(raw)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::build(iter)
    }
}
