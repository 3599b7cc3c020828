//! Data Vault entity stores
//!
//! Hubs, links and satellites each live in a table whose columns are named by
//! configuration. A store owns that naming and turns entity values into
//! parameterized statements; the connection is handed in on every call.
//!
//! Writes are dedup inserts: a single `INSERT ... SELECT ... WHERE NOT EXISTS`
//! statement, so saving the same key twice, or from two writers at once,
//! leaves one row. The second save reports `SaveOutcome::AlreadyPresent`.
//!
//! # Example
//!
//! ```no_run
//! use datavault::db::SqliteDatabase;
//! use datavault::vault::{EntityStore, FieldMap, Link, LinkLayout, LinkStore, LoadDatePrecision};
//!
//! let db = SqliteDatabase::open("vault.db")?;
//! let links = LinkStore::new(
//!     &LinkLayout {
//!         table: "link_family".into(),
//!         source_column: "record_source".into(),
//!         load_date_column: "load_date".into(),
//!         hash_key_column: "link_hash".into(),
//!         field_map: FieldMap::build([("parent", "col_p"), ("child", "col_c")]),
//!     },
//!     LoadDatePrecision::Milliseconds,
//! )?;
//!
//! links.save(&db, &Link::new("crm", "L1", [("parent", "H1"), ("child", "H2")]))?;
//! assert!(links.exists(&db, "L1")?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod field_map;
pub mod hub;
pub mod ident;
pub mod link;
pub mod load_date;
pub mod model;
pub mod query;
pub mod satellite;
pub mod store;

pub use error::{SaveOutcome, VaultError, VaultResult};
pub use field_map::FieldMap;
pub use hub::{HubLayout, HubStore};
pub use ident::Ident;
pub use link::{LinkLayout, LinkStore};
pub use load_date::LoadDatePrecision;
pub use model::{Hub, Link, Satellite};
pub use satellite::{SatelliteKey, SatelliteLayout, SatelliteStore};
pub use store::EntityStore;
