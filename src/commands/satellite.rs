use anyhow::Result;
use datavault::{EntityStore, Satellite, SatelliteKey, Value, VaultConfig};

use super::{parse_pair, print_json, report_delete, report_exists, report_save};

/// Satellite table subcommands
#[derive(Debug, Clone, clap::Subcommand)]
pub enum SatAction {
    /// Check whether a hash diff is stored
    Exists {
        hash_diff: String,

        /// Only match rows under this hub
        #[arg(long)]
        hub_hash: Option<String>,
    },

    /// Print a stored satellite (newest first when --hub-hash is omitted)
    Get {
        hash_diff: String,

        #[arg(long)]
        hub_hash: Option<String>,
    },

    /// Store a satellite unless the (hash diff, hub hash) pair is present
    Save {
        #[arg(long)]
        hash_diff: String,

        #[arg(long)]
        hub_hash: String,

        /// Record source
        #[arg(long)]
        source: String,

        /// Attribute as field=value (repeatable)
        #[arg(long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Remove stored satellites (all hubs when --hub-hash is omitted)
    Delete {
        hash_diff: String,

        #[arg(long)]
        hub_hash: Option<String>,
    },
}

fn key<'k>(hash_diff: &'k str, hub_hash: &'k Option<String>) -> SatelliteKey<'k> {
    SatelliteKey {
        hash_diff,
        hub_hash: hub_hash.as_deref(),
    }
}

pub fn execute(config: &VaultConfig, name: &str, action: SatAction, json: bool) -> Result<()> {
    let (store, conn) = config.satellite_store(name)?;

    match action {
        SatAction::Exists {
            hash_diff,
            hub_hash,
        } => report_exists(
            store.exists(&conn, key(&hash_diff, &hub_hash))?,
            &hash_diff,
            json,
        ),
        SatAction::Get {
            hash_diff,
            hub_hash,
        } => {
            let sat = store.get(&conn, key(&hash_diff, &hub_hash))?;
            if json {
                return print_json(&sat);
            }
            println!("hash_diff: {}", sat.hash_diff());
            println!("hub_hash:  {}", sat.hub_hash());
            println!("source:    {}", sat.source());
            println!("load_date: {}", sat.load_date());
            for (field, value) in sat.data() {
                println!("  {} = {}", field, value);
            }
            Ok(())
        }
        SatAction::Save {
            hash_diff,
            hub_hash,
            source,
            fields,
        } => {
            let data = fields
                .into_iter()
                .map(|(field, value)| (field, Value::Text(value)));
            let sat = Satellite::new(source, hash_diff.as_str(), hub_hash, data);
            report_save(store.save(&conn, &sat)?, &hash_diff, json)
        }
        SatAction::Delete {
            hash_diff,
            hub_hash,
        } => report_delete(
            store.delete(&conn, key(&hash_diff, &hub_hash))?,
            &hash_diff,
            json,
        ),
    }
}
