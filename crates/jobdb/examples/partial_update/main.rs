//! Example demonstrating partial update payloads and their SET fragments.
//!
//! Run with:
//!   cargo run --example partial_update -p jobdb
//!
//! Everything here is offline: the point is to show exactly which SQL a
//! payload turns into before it ever reaches a database.

use jobdb::{ColumnMap, DbResult, Patch};
use serde_json::json;

fn main() -> DbResult<()> {
    // A payload built in code: two fields, in the order they were set.
    let patch = Patch::new().set("firstName", "Aliya").set("age", 32i64);
    let columns = ColumnMap::new().map("firstName", "first_name");

    let frag = patch.set_clause(&columns)?;
    println!("set clause: {}", frag.sql);
    println!("params     = {}\n", frag.params.len());

    // The same payload arriving as JSON. Key order is preserved, `null`
    // clears a column, and omitted fields never appear.
    let body = json!({
        "name": "NewCo",
        "numEmployees": 40,
        "logoUrl": null
    });
    let object = body.as_object().cloned().unwrap_or_default();
    let patch = Patch::from_json(&object)?;

    let columns = ColumnMap::new()
        .map("numEmployees", "num_employees")
        .map("logoUrl", "logo_url");
    let frag = patch.set_clause(&columns)?;
    println!("from json : {}", frag.sql);
    println!("params     = {}\n", frag.params.len());

    // An empty payload is refused before any SQL exists.
    match Patch::new().set_clause(&ColumnMap::new()) {
        Ok(_) => println!("unexpected: empty payload built a clause"),
        Err(err) => println!("empty payload: {err}"),
    }

    Ok(())
}
