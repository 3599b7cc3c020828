use anyhow::Result;
use colored::*;
use datavault::VaultConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TableSummary<'a> {
    kind: &'static str,
    name: &'a str,
    table: &'a str,
    connection: &'a str,
    mapped_columns: usize,
}

/// Print the tables a validated configuration describes
pub fn execute(config: &VaultConfig, json: bool) -> Result<()> {
    let mut tables = Vec::new();
    for hub in &config.hubs {
        tables.push(TableSummary {
            kind: "hub",
            name: &hub.name,
            table: &hub.layout.table,
            connection: &hub.connection,
            mapped_columns: 0,
        });
    }
    for link in &config.links {
        tables.push(TableSummary {
            kind: "link",
            name: &link.name,
            table: &link.layout.table,
            connection: &link.connection,
            mapped_columns: link.layout.field_map.len(),
        });
    }
    for sat in &config.satellites {
        tables.push(TableSummary {
            kind: "satellite",
            name: &sat.name,
            table: &sat.layout.table,
            connection: &sat.connection,
            mapped_columns: sat.layout.field_map.len(),
        });
    }

    if json {
        return super::print_json(&tables);
    }

    println!(
        "{} ({} connection(s), load dates in {:?})",
        "✓ Configuration valid".green().bold(),
        config.connections.len(),
        config.precision()
    );
    for t in &tables {
        println!(
            "  {:<9} {:<20} {} @ {} {}",
            t.kind,
            t.name,
            t.table,
            t.connection,
            format!("({} mapped)", t.mapped_columns).dimmed()
        );
    }
    Ok(())
}
