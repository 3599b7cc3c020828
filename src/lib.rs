pub mod config;
pub mod db;
pub mod vault;

// Re-export commonly used types
pub use config::VaultConfig;
pub use db::{DatabaseBackend, SqliteDatabase, Value, VaultConnection};
pub use vault::{
    EntityStore, FieldMap, Hub, HubStore, Link, LinkStore, LoadDatePrecision, Satellite,
    SatelliteKey, SatelliteStore, SaveOutcome, VaultError, VaultResult,
};
