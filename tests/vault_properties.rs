//! Behaviour of the three stores against a file-backed SQLite database

mod common;

use anyhow::Result;
use common::{count_rows, hub_layout, link_layout, satellite_layout, Vault};
use datavault::{
    EntityStore, FieldMap, Hub, HubStore, Link, LinkStore, LoadDatePrecision, Satellite,
    SatelliteKey, SatelliteStore, SaveOutcome, Value,
};
use std::collections::BTreeMap;

fn stores() -> Result<(HubStore, LinkStore, SatelliteStore)> {
    let precision = LoadDatePrecision::Milliseconds;
    Ok((
        HubStore::new(&hub_layout(), precision)?,
        LinkStore::new(&link_layout(), precision)?,
        SatelliteStore::new(&satellite_layout(), precision)?,
    ))
}

#[test]
fn test_hub_saved_twice_has_one_row() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (hubs, _, _) = stores()?;

    let hub = Hub::new("s1", "ABC", "H1");
    assert_eq!(hubs.save(&db, &hub)?, SaveOutcome::Inserted);
    assert_eq!(hubs.save(&db, &hub)?, SaveOutcome::AlreadyPresent);

    assert_eq!(count_rows(&db, "hub_customer", "hub_hash", "H1")?, 1);
    Ok(())
}

#[test]
fn test_hub_round_trip() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (hubs, _, _) = stores()?;

    let hub = Hub::new("s1", "ABC", "H1");
    hubs.save(&db, &hub)?;

    let loaded = hubs.get(&db, "H1")?;
    assert_eq!(loaded.source(), hub.source());
    assert_eq!(loaded.data(), hub.data());
    assert_eq!(loaded.hash_key(), hub.hash_key());
    Ok(())
}

#[test]
fn test_existence_follows_writes() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (hubs, links, sats) = stores()?;

    assert!(!hubs.exists(&db, "H1")?);
    hubs.save(&db, &Hub::new("s1", "ABC", "H1"))?;
    assert!(hubs.exists(&db, "H1")?);
    hubs.delete(&db, "H1")?;
    assert!(!hubs.exists(&db, "H1")?);

    assert!(!links.exists(&db, "L1")?);
    links.save(&db, &Link::new("s1", "L1", [("parent", "H1")]))?;
    assert!(links.exists(&db, "L1")?);
    links.delete(&db, "L1")?;
    assert!(!links.exists(&db, "L1")?);

    let key = SatelliteKey::under("D1", "H1");
    assert!(!sats.exists(&db, key)?);
    sats.save(&db, &Satellite::new("s1", "D1", "H1", [("name", "Ada")]))?;
    assert!(sats.exists(&db, key)?);
    sats.delete(&db, key)?;
    assert!(!sats.exists(&db, key)?);
    Ok(())
}

#[test]
fn test_field_map_case_insensitive() {
    let map = FieldMap::build([("Name", "col_x")]);
    assert_eq!(map.resolve("name"), Some("col_x"));
    assert_eq!(map.resolve("NAME"), Some("col_x"));
}

#[test]
fn test_link_scenario() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (_, links, _) = stores()?;

    links.save(&db, &Link::new("s1", "L1", [("parent", "H1"), ("child", "H2")]))?;
    assert!(links.exists(&db, "L1")?);

    let loaded = links.get(&db, "L1")?;
    let expected = BTreeMap::from([
        ("child".to_string(), "H2".to_string()),
        ("parent".to_string(), "H1".to_string()),
    ]);
    assert_eq!(loaded.links(), &expected);

    links.delete(&db, "L1")?;
    assert!(!links.exists(&db, "L1")?);
    Ok(())
}

#[test]
fn test_link_partial_roles() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (_, links, _) = stores()?;

    links.save(&db, &Link::new("s1", "L2", [("child", "H2")]))?;

    let loaded = links.get(&db, "L2")?;
    assert_eq!(
        loaded.links(),
        &BTreeMap::from([("child".to_string(), "H2".to_string())])
    );
    Ok(())
}

#[test]
fn test_satellite_optional_hub_hash() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (_, _, sats) = stores()?;

    sats.save(&db, &Satellite::new("s1", "D1", "H1", [("name", "Ada")]))?;
    sats.save(&db, &Satellite::new("s1", "D1", "H2", [("name", "Ada")]))?;

    assert!(sats.exists(&db, SatelliteKey::new("D1"))?);
    assert!(!sats.exists(&db, SatelliteKey::under("D1", "wrong"))?);
    assert_eq!(count_rows(&db, "sat_customer", "hash_diff", "D1")?, 2);
    Ok(())
}

#[test]
fn test_satellite_partial_fields() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (_, _, sats) = stores()?;

    let sat = Satellite::new(
        "s1",
        "D2",
        "H1",
        [("city", Value::from("Lagos")), ("shoe_size", Value::Integer(43))],
    );
    sats.save(&db, &sat)?;

    let loaded = sats.get(&db, SatelliteKey::from(&sat))?;
    assert_eq!(
        loaded.data(),
        &BTreeMap::from([("city".to_string(), Value::from("Lagos"))])
    );
    Ok(())
}

#[test]
fn test_malformed_distinct_from_missing() -> Result<()> {
    let vault = Vault::new()?;
    let db = vault.open()?;
    let (_, links, _) = stores()?;

    db.execute_batch(
        "INSERT INTO link_family (link_hash, record_source, load_date)
         VALUES ('L9', 's1', '2024-01-01 00:00:00')",
    )?;

    assert!(links.get(&db, "L9").unwrap_err().is_malformed());
    assert!(links.get(&db, "L10").unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn test_transaction_connection() -> Result<()> {
    let vault = Vault::new()?;
    let mut db = vault.open()?;
    let (hubs, links, _) = stores()?;

    let tx = db.connection_mut().transaction()?;
    hubs.save(&*tx, &Hub::new("s1", "ABC", "H1"))?;
    links.save(&*tx, &Link::new("s1", "L1", [("parent", "H1")]))?;
    tx.rollback()?;

    assert!(!hubs.exists(&db, "H1")?);
    assert!(!links.exists(&db, "L1")?);
    Ok(())
}
