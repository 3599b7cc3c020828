use anyhow::Result;
use datavault::{EntityStore, Hub, VaultConfig};

use super::{print_json, report_delete, report_exists, report_save};

/// Hub table subcommands
#[derive(Debug, Clone, clap::Subcommand)]
pub enum HubAction {
    /// Check whether a hash key is stored
    Exists { hash_key: String },

    /// Print the hub stored under a hash key
    Get { hash_key: String },

    /// Store a hub unless its hash key is already present
    Save {
        #[arg(long)]
        hash_key: String,

        /// Record source
        #[arg(long)]
        source: String,

        /// Business key
        #[arg(long)]
        data: String,
    },

    /// Remove the hub stored under a hash key
    Delete { hash_key: String },
}

pub fn execute(config: &VaultConfig, name: &str, action: HubAction, json: bool) -> Result<()> {
    let (store, conn) = config.hub_store(name)?;

    match action {
        HubAction::Exists { hash_key } => {
            report_exists(store.exists(&conn, hash_key.as_str())?, &hash_key, json)
        }
        HubAction::Get { hash_key } => {
            let hub = store.get(&conn, hash_key.as_str())?;
            if json {
                return print_json(&hub);
            }
            println!("hash_key:  {}", hub.hash_key());
            println!("data:      {}", hub.data());
            println!("source:    {}", hub.source());
            println!("load_date: {}", hub.load_date());
            Ok(())
        }
        HubAction::Save {
            hash_key,
            source,
            data,
        } => {
            let outcome = store.save(&conn, &Hub::new(source, data, hash_key.as_str()))?;
            report_save(outcome, &hash_key, json)
        }
        HubAction::Delete { hash_key } => {
            report_delete(store.delete(&conn, hash_key.as_str())?, &hash_key, json)
        }
    }
}
