use serde::Serialize;
use thiserror::Error;
use tilesmith_schema::{DeploymentConfig, PropertyCatalog, ResourceSet};
use tracing::debug;

#[derive(Debug, Error)]
#[error("failed to serialize {document} document: {reason}")]
pub struct AssembleError {
    pub document: &'static str,
    pub reason: String,
}

impl AssembleError {
    fn new(document: &'static str, reason: impl ToString) -> Self {
        Self {
            document,
            reason: reason.to_string(),
        }
    }
}

/// What went into the documents, without any secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblySummary {
    pub properties: usize,
    pub sensitive_properties: usize,
    pub resource_jobs: Vec<String>,
}

/// The three serialized documents submitted for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocuments {
    pub network: String,
    pub properties: String,
    pub resources: String,
    pub summary: AssemblySummary,
}

/// Build the network, properties and resources documents.
///
/// `network` is forwarded unchanged. Platform defaults come from
/// `cfg.defaults`. Either all three documents are produced or none is.
pub fn assemble<N>(cfg: &DeploymentConfig, network: &N) -> Result<AssembledDocuments, AssembleError>
where
    N: Serialize + ?Sized,
{
    let network = serde_json::to_string(network).map_err(|e| AssembleError::new("network", e))?;

    let catalog = PropertyCatalog::build(cfg, &cfg.defaults);
    let properties = catalog
        .to_json()
        .map_err(|e| AssembleError::new("properties", e))?;

    let resource_set = ResourceSet::build(cfg, &cfg.defaults);
    let resources = resource_set
        .to_json()
        .map_err(|e| AssembleError::new("resources", e))?;

    debug!(
        "assembled documents: network {} bytes, properties {} bytes, resources {} bytes",
        network.len(),
        properties.len(),
        resources.len()
    );

    let summary = AssemblySummary {
        properties: catalog.len(),
        sensitive_properties: catalog
            .entries()
            .iter()
            .filter(|e| e.value.is_sensitive())
            .count(),
        resource_jobs: resource_set.jobs().map(str::to_owned).collect(),
    };

    Ok(AssembledDocuments {
        network,
        properties,
        resources,
        summary,
    })
}
