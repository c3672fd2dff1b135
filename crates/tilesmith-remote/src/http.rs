use crate::{OpsManagerApi, ProductRef, RemoteConfig, RemoteError};
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use ureq::typestate::WithBody;
use ureq::RequestBuilder;

/// Document sections of a staged product, in submission order.
pub const DOCUMENT_SECTIONS: [&str; 3] = ["networks_and_azs", "properties", "resources"];

/// HTTP client for the orchestration API.
///
/// Expects a REST API:
/// - `POST /api/v0/staged/products` stages `{"name", "product_version"}`
/// - `PUT  /api/v0/staged/products/<name>/<section>` submits `{"<section>": doc}`
///   for each of [`DOCUMENT_SECTIONS`], in order
pub struct HttpOpsManager {
    config: RemoteConfig,
    agent: ureq::Agent,
}

impl HttpOpsManager {
    pub fn new(config: RemoteConfig) -> Self {
        let agent = ureq::Agent::new_with_defaults();
        Self { config, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    fn staged_products_url(&self) -> String {
        format!("{}/api/v0/staged/products", self.config.url)
    }

    fn section_url(&self, product_name: &str, section: &str) -> String {
        format!("{}/{product_name}/{section}", self.staged_products_url())
    }

    fn do_send(
        &self,
        req: RequestBuilder<WithBody>,
        url: &str,
        body: &[u8],
        rejected: impl FnOnce(String) -> RemoteError,
    ) -> Result<(), RemoteError> {
        let mut req = req
            .header("Content-Type", "application/json")
            .header("X-Tilesmith-Protocol", &crate::PROTOCOL_VERSION.to_string());
        if let Some(ref token) = self.config.auth_token {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }
        match req.send(body) {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(404)) => Err(RemoteError::NotFound(url.to_owned())),
            Err(ureq::Error::StatusCode(code @ (409 | 422))) => {
                Err(rejected(format!("HTTP {code} for {url}")))
            }
            Err(ureq::Error::StatusCode(code)) => {
                Err(RemoteError::Http(format!("HTTP {code} for {url}")))
            }
            Err(e) => Err(RemoteError::Http(e.to_string())),
        }
    }

    fn put_section(&self, product_name: &str, section: &str, doc: &str) -> Result<(), RemoteError> {
        // Embedded verbatim; key order is part of the document.
        let raw: &RawValue = serde_json::from_str(doc)
            .map_err(|e| RemoteError::Serialization(format!("{section} document: {e}")))?;
        let body = serde_json::to_vec(&BTreeMap::from([(section, raw)]))
            .map_err(|e| RemoteError::Serialization(e.to_string()))?;

        let url = self.section_url(product_name, section);
        tracing::debug!("PUT {url} ({} bytes)", body.len());
        self.do_send(self.agent.put(&url), &url, &body, |reason| {
            RemoteError::ConfigureRejected {
                product: product_name.to_owned(),
                reason,
            }
        })
    }
}

impl OpsManagerApi for HttpOpsManager {
    fn stage_product(&self, product: &ProductRef) -> Result<(), RemoteError> {
        let url = self.staged_products_url();
        let body =
            serde_json::to_vec(product).map_err(|e| RemoteError::Serialization(e.to_string()))?;
        tracing::debug!("POST {url} ({product})");
        self.do_send(self.agent.post(&url), &url, &body, |reason| {
            RemoteError::StageRejected {
                product: product.to_string(),
                reason,
            }
        })
    }

    fn configure_product(
        &self,
        product_name: &str,
        network: &str,
        properties: &str,
        resources: &str,
    ) -> Result<(), RemoteError> {
        for (section, doc) in DOCUMENT_SECTIONS.into_iter().zip([network, properties, resources]) {
            self.put_section(product_name, section, doc)?;
        }
        Ok(())
    }
}
