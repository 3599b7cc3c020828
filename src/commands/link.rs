use anyhow::Result;
use datavault::{EntityStore, Link, VaultConfig};

use super::{parse_pair, print_json, report_delete, report_exists, report_save};

/// Link table subcommands
#[derive(Debug, Clone, clap::Subcommand)]
pub enum LinkAction {
    /// Check whether a hash key is stored
    Exists { hash_key: String },

    /// Print the link stored under a hash key
    Get { hash_key: String },

    /// Store a link unless its hash key is already present
    Save {
        #[arg(long)]
        hash_key: String,

        /// Record source
        #[arg(long)]
        source: String,

        /// Linked hub as role=hub_hash (repeatable)
        #[arg(long = "role", value_parser = parse_pair, required = true)]
        roles: Vec<(String, String)>,
    },

    /// Remove the link stored under a hash key
    Delete { hash_key: String },
}

pub fn execute(config: &VaultConfig, name: &str, action: LinkAction, json: bool) -> Result<()> {
    let (store, conn) = config.link_store(name)?;

    match action {
        LinkAction::Exists { hash_key } => {
            report_exists(store.exists(&conn, hash_key.as_str())?, &hash_key, json)
        }
        LinkAction::Get { hash_key } => {
            let link = store.get(&conn, hash_key.as_str())?;
            if json {
                return print_json(&link);
            }
            println!("hash_key:  {}", link.hash_key());
            println!("source:    {}", link.source());
            println!("load_date: {}", link.load_date());
            for (role, hub_hash) in link.links() {
                println!("  {} -> {}", role, hub_hash);
            }
            Ok(())
        }
        LinkAction::Save {
            hash_key,
            source,
            roles,
        } => {
            let unmapped: Vec<&str> = roles
                .iter()
                .map(|(role, _)| role.as_str())
                .filter(|role| store.field_map().resolve(role).is_none())
                .collect();
            if !unmapped.is_empty() {
                eprintln!("⚠️  Roles not in field map, skipped: {}", unmapped.join(", "));
            }

            let outcome = store.save(&conn, &Link::new(source, hash_key.as_str(), roles))?;
            report_save(outcome, &hash_key, json)
        }
        LinkAction::Delete { hash_key } => {
            report_delete(store.delete(&conn, hash_key.as_str())?, &hash_key, json)
        }
    }
}
