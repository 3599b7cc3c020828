//! Deployment configuration
//!
//! One TOML file names the connections and describes every hub, link and
//! satellite table. Named connections are opened on request and handed to the
//! stores by the caller; nothing here keeps a connection selected.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::db::{ConnectionConfig, DatabaseBackend};
use crate::vault::{
    HubLayout, HubStore, LinkLayout, LinkStore, LoadDatePrecision, SatelliteLayout,
    SatelliteStore,
};

/// Vault configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Write load dates with milliseconds rather than whole seconds
    #[serde(default = "default_millisecond_precision")]
    pub millisecond_precision: bool,

    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,

    #[serde(default)]
    pub hubs: Vec<TableConfig<HubLayout>>,

    #[serde(default)]
    pub links: Vec<TableConfig<LinkLayout>>,

    #[serde(default)]
    pub satellites: Vec<TableConfig<SatelliteLayout>>,
}

/// A named table and the connection it lives on
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig<L> {
    pub name: String,
    pub connection: String,
    #[serde(flatten)]
    pub layout: L,
}

fn default_millisecond_precision() -> bool {
    true
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            millisecond_precision: default_millisecond_precision(),
            connections: BTreeMap::new(),
            hubs: Vec::new(),
            links: Vec::new(),
            satellites: Vec::new(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::load_from_str(&content)
    }

    /// Load configuration from string
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse vault configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn precision(&self) -> LoadDatePrecision {
        LoadDatePrecision::from_millisecond_flag(self.millisecond_precision)
    }

    /// Validate configuration
    ///
    /// Builds every store once so bad identifiers and overlapping columns are
    /// reported at load time rather than on first use.
    fn validate(&self) -> Result<()> {
        for (name, connection) in &self.connections {
            connection
                .validate()
                .with_context(|| format!("Invalid connection '{}'", name))?;
        }

        self.check_tables("hub", &self.hubs, |layout, p| HubStore::new(layout, p).map(drop))?;
        self.check_tables("link", &self.links, |layout, p| {
            LinkStore::new(layout, p).map(drop)
        })?;
        self.check_tables("satellite", &self.satellites, |layout, p| {
            SatelliteStore::new(layout, p).map(drop)
        })?;

        Ok(())
    }

    fn check_tables<L>(
        &self,
        kind: &str,
        tables: &[TableConfig<L>],
        build: impl Fn(&L, LoadDatePrecision) -> crate::vault::VaultResult<()>,
    ) -> Result<()> {
        let mut names = BTreeSet::new();
        for table in tables {
            if !names.insert(table.name.as_str()) {
                anyhow::bail!("Duplicate {} name '{}'", kind, table.name);
            }
            if !self.connections.contains_key(&table.connection) {
                anyhow::bail!(
                    "{} '{}' uses undeclared connection '{}'",
                    kind,
                    table.name,
                    table.connection
                );
            }
            build(&table.layout, self.precision())
                .with_context(|| format!("Invalid {} '{}'", kind, table.name))?;
        }
        Ok(())
    }

    /// Open the named connection
    pub fn open_connection(&self, name: &str) -> Result<DatabaseBackend> {
        self.connections
            .get(name)
            .with_context(|| format!("Unknown connection '{}'", name))?
            .open()
    }

    pub fn hub(&self, name: &str) -> Result<&TableConfig<HubLayout>> {
        find(&self.hubs, "hub", name)
    }

    pub fn link(&self, name: &str) -> Result<&TableConfig<LinkLayout>> {
        find(&self.links, "link", name)
    }

    pub fn satellite(&self, name: &str) -> Result<&TableConfig<SatelliteLayout>> {
        find(&self.satellites, "satellite", name)
    }

    /// Store and connection for a configured hub table
    pub fn hub_store(&self, name: &str) -> Result<(HubStore, DatabaseBackend)> {
        let table = self.hub(name)?;
        let store = HubStore::new(&table.layout, self.precision())?;
        Ok((store, self.open_connection(&table.connection)?))
    }

    pub fn link_store(&self, name: &str) -> Result<(LinkStore, DatabaseBackend)> {
        let table = self.link(name)?;
        let store = LinkStore::new(&table.layout, self.precision())?;
        Ok((store, self.open_connection(&table.connection)?))
    }

    pub fn satellite_store(&self, name: &str) -> Result<(SatelliteStore, DatabaseBackend)> {
        let table = self.satellite(name)?;
        let store = SatelliteStore::new(&table.layout, self.precision())?;
        Ok((store, self.open_connection(&table.connection)?))
    }
}

fn find<'a, L>(tables: &'a [TableConfig<L>], kind: &str, name: &str) -> Result<&'a TableConfig<L>> {
    tables
        .iter()
        .find(|t| t.name == name)
        .with_context(|| format!("No {} named '{}' in configuration", kind, name))
}
