use super::{colorize_kind, json_pretty, load_config, EXIT_SUCCESS};
use serde::Serialize;
use std::path::Path;
use tilesmith_schema::{PropertyCatalog, ResourceSet};

#[derive(Serialize)]
struct PropertyRow<'a> {
    name: &'a str,
    path: &'a str,
    kind: String,
    value: String,
}

/// Validate the config and show what would be submitted, with secrets masked.
pub fn run(config_path: &Path, json: bool) -> Result<u8, String> {
    let cfg = load_config(config_path)?;
    let catalog = PropertyCatalog::build(&cfg, &cfg.defaults);
    let resources = ResourceSet::build(&cfg, &cfg.defaults);

    if json {
        let rows: Vec<PropertyRow<'_>> = catalog
            .entries()
            .iter()
            .map(|e| PropertyRow {
                name: &e.name,
                path: &e.path,
                kind: e.value.kind().to_string(),
                value: e.value.to_string(),
            })
            .collect();
        let payload = serde_json::json!({
            "product": cfg.product.name,
            "properties": rows,
            "resources": resources,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("{:<32} {:<12} VALUE", "PROPERTY", "KIND");
    for entry in catalog.entries() {
        println!(
            "{:<32} {} {}",
            entry.name,
            colorize_kind(entry.value.kind(), 12),
            entry.value
        );
    }
    println!();
    println!("{:<14} {:<10} {:<6} BINDINGS", "JOB", "INSTANCES", "PUBLIC");
    for job in resources.jobs() {
        let Some(r) = resources.get(job) else { continue };
        let instances = r
            .instances
            .map_or_else(|| "default".to_owned(), |n| n.to_string());
        let bindings: Vec<String> = r.bindings.iter().map(ToString::to_string).collect();
        println!(
            "{:<14} {:<10} {:<6} {}",
            job,
            instances,
            r.internet_connected,
            bindings.join(", ")
        );
    }
    println!();
    println!(
        "config ok: {} properties, {} resource jobs",
        catalog.len(),
        resources.len()
    );
    Ok(EXIT_SUCCESS)
}
