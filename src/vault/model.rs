//! Hub, Link and Satellite values
//!
//! These are what the stores read and write. They know nothing about tables or
//! columns; each store maps them onto its own layout.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::Value;

/// A unique business key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hub {
    source: String,
    load_date: DateTime<Utc>,
    data: String,
    hash_key: String,
}

impl Hub {
    pub fn new(
        source: impl Into<String>,
        data: impl Into<String>,
        hash_key: impl Into<String>,
    ) -> Self {
        Self::with_load_date(source, Utc::now(), data, hash_key)
    }

    pub fn with_load_date(
        source: impl Into<String>,
        load_date: DateTime<Utc>,
        data: impl Into<String>,
        hash_key: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            load_date,
            data: data.into(),
            hash_key: hash_key.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn load_date(&self) -> DateTime<Utc> {
        self.load_date
    }

    /// The business key itself
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }
}

/// A relationship between hubs, keyed by role name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    source: String,
    load_date: DateTime<Utc>,
    hash_key: String,
    links: BTreeMap<String, String>,
}

impl Link {
    /// `links` maps each role to the hash key of the hub playing it
    pub fn new<I, K, V>(source: impl Into<String>, hash_key: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_load_date(source, Utc::now(), hash_key, links)
    }

    pub fn with_load_date<I, K, V>(
        source: impl Into<String>,
        load_date: DateTime<Utc>,
        hash_key: impl Into<String>,
        links: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: source.into(),
            load_date,
            hash_key: hash_key.into(),
            links: links
                .into_iter()
                .map(|(role, hash)| (role.into(), hash.into()))
                .collect(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn load_date(&self) -> DateTime<Utc> {
        self.load_date
    }

    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }

    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }

    /// Hash key of the hub playing `role`, if any
    pub fn hub(&self, role: &str) -> Option<&str> {
        self.links.get(role).map(String::as_str)
    }
}

/// Descriptive attributes of a hub at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Satellite {
    source: String,
    load_date: DateTime<Utc>,
    hash_diff: String,
    hub_hash: String,
    data: BTreeMap<String, Value>,
}

impl Satellite {
    pub fn new<I, K, V>(
        source: impl Into<String>,
        hash_diff: impl Into<String>,
        hub_hash: impl Into<String>,
        data: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_load_date(source, Utc::now(), hash_diff, hub_hash, data)
    }

    pub fn with_load_date<I, K, V>(
        source: impl Into<String>,
        load_date: DateTime<Utc>,
        hash_diff: impl Into<String>,
        hub_hash: impl Into<String>,
        data: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            source: source.into(),
            load_date,
            hash_diff: hash_diff.into(),
            hub_hash: hub_hash.into(),
            data: data
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn load_date(&self) -> DateTime<Utc> {
        self.load_date
    }

    pub fn hash_diff(&self) -> &str {
        &self.hash_diff
    }

    /// Hash key of the hub this satellite describes
    pub fn hub_hash(&self) -> &str {
        &self.hub_hash
    }

    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}
