//! `dv2` subcommands
//!
//! Each table kind gets one module exposing its clap subcommand enum and an
//! `execute` function. Stores and connections are built from the loaded
//! configuration per invocation.

pub mod check;
pub mod hub;
pub mod link;
pub mod satellite;

use anyhow::Result;
use colored::*;
use datavault::SaveOutcome;
use serde::Serialize;

/// Parse a `key=value` argument
pub fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn report_save(outcome: SaveOutcome, key: &str, json: bool) -> Result<()> {
    let inserted = outcome.was_inserted();
    if json {
        return print_json(&serde_json::json!({ "key": key, "inserted": inserted }));
    }
    if inserted {
        println!("{} Saved {}", "✓".green(), key);
    } else {
        println!("{} {} already present, nothing written", "•".dimmed(), key);
    }
    Ok(())
}

pub(crate) fn report_exists(exists: bool, key: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "key": key, "exists": exists }));
    }
    println!("{}", exists);
    Ok(())
}

pub(crate) fn report_delete(removed: usize, key: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "key": key, "removed": removed }));
    }
    println!("{} Removed {} row(s) for {}", "✓".green(), removed, key);
    Ok(())
}
