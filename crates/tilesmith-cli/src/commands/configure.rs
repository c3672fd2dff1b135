use super::{
    json_pretty, load_config, make_client, product_ref, resolve_network, spin_fail, spin_ok,
    spinner, EXIT_SUCCESS,
};
use std::path::Path;
use tilesmith_core::{Configurator, CoreError};

pub fn run(
    config_path: &Path,
    remote_url: Option<&str>,
    token: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let cfg = load_config(config_path)?;
    let network = resolve_network(&cfg)?;
    let product = product_ref(&cfg);
    let client = make_client(remote_url, token)?;

    let pb = spinner(&format!("configuring {product}…"));
    let mut configurator = Configurator::new(&client);
    let docs = configurator
        .run(&product, &cfg, &network)
        .map_err(|e| {
            spin_fail(&pb, &format!("configure failed ({})", configurator.state()));
            describe(&e)
        })?;
    spin_ok(&pb, "configure complete");

    if json {
        let payload = serde_json::json!({
            "product": product.name,
            "version": product.version,
            "state": configurator.state(),
            "summary": docs.summary,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "configured {product}: {} properties, resource jobs: {}",
            docs.summary.properties,
            docs.summary.resource_jobs.join(", ")
        );
    }
    Ok(EXIT_SUCCESS)
}

fn describe(err: &CoreError) -> String {
    match err {
        CoreError::Remote(e) => format!("remote error: {e}"),
        other => other.to_string(),
    }
}
