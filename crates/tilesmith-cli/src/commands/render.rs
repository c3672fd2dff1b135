use super::{json_pretty, load_config, pretty_document, resolve_network, EXIT_SUCCESS};
use std::path::Path;
use tilesmith_core::{assemble, AssembledDocuments};

pub const DOCUMENT_FILES: [&str; 3] = ["network.json", "properties.json", "resources.json"];

/// Assemble the documents without contacting the remote.
///
/// With `output_dir` the three documents are written as files; otherwise they
/// are printed as one JSON object. Secrets are included as submitted.
pub fn run(config_path: &Path, output_dir: Option<&Path>, json: bool) -> Result<u8, String> {
    let cfg = load_config(config_path)?;
    let network = resolve_network(&cfg)?;
    let docs = assemble(&cfg, &network).map_err(|e| e.to_string())?;

    let Some(dir) = output_dir else {
        let payload = serde_json::json!({
            "network": parse(&docs.network)?,
            "properties": parse(&docs.properties)?,
            "resources": parse(&docs.resources)?,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    };

    write_documents(dir, &docs)?;
    if json {
        let payload = serde_json::json!({
            "output_dir": dir.display().to_string(),
            "files": DOCUMENT_FILES,
            "summary": docs.summary,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "wrote {} properties ({} sensitive) and {} resource jobs to {}",
            docs.summary.properties,
            docs.summary.sensitive_properties,
            docs.summary.resource_jobs.len(),
            dir.display()
        );
    }
    Ok(EXIT_SUCCESS)
}

fn parse(doc: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(doc).map_err(|e| format!("invalid document: {e}"))
}

fn write_documents(dir: &Path, docs: &AssembledDocuments) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    for (file, doc) in DOCUMENT_FILES
        .into_iter()
        .zip([&docs.network, &docs.properties, &docs.resources])
    {
        let path = dir.join(file);
        std::fs::write(&path, pretty_document(doc)?)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }
    Ok(())
}
