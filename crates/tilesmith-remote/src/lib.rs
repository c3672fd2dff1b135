//! Client side of the product orchestration API.
//!
//! This crate defines the `OpsManagerApi` seam used by the submission
//! workflow, an HTTP implementation (`HttpOpsManager`), a recording
//! in-memory double (`MockOpsManager`), and the remote endpoint config.

pub mod config;
pub mod http;
pub mod mock;

pub use config::RemoteConfig;
pub use http::HttpOpsManager;
pub use mock::{MockOpsManager, RecordedCall};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Protocol version sent as `X-Tilesmith-Protocol` header on all HTTP requests.
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("remote config error: {0}")]
    Config(String),
    #[error("staging of '{product}' rejected: {reason}")]
    StageRejected { product: String, reason: String },
    #[error("configuration of '{product}' rejected: {reason}")]
    ConfigureRejected { product: String, reason: String },
}

/// The product to stage: a name plus an optional version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
    #[serde(rename = "product_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ProductRef {
    pub fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            version: version.map(str::to_owned),
        }
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{v}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// The two operations the submission workflow needs from the remote side.
///
/// Calls are blocking. Implementations do not retry.
pub trait OpsManagerApi: Send + Sync {
    /// Make the product's configuration schema available for editing.
    fn stage_product(&self, product: &ProductRef) -> Result<(), RemoteError>;

    /// Submit the three configuration documents for a staged product.
    fn configure_product(
        &self,
        product_name: &str,
        network: &str,
        properties: &str,
        resources: &str,
    ) -> Result<(), RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_ref_display() {
        assert_eq!(ProductRef::new("cf", Some("1.12.0")).to_string(), "cf@1.12.0");
        assert_eq!(ProductRef::new("cf", None).to_string(), "cf");
    }

    #[test]
    fn product_ref_wire_shape() {
        let json = serde_json::to_string(&ProductRef::new("cf", Some("1.12.0"))).unwrap();
        assert_eq!(json, r#"{"name":"cf","product_version":"1.12.0"}"#);
        let json = serde_json::to_string(&ProductRef::new("cf", None)).unwrap();
        assert_eq!(json, r#"{"name":"cf"}"#);
    }

    #[test]
    fn remote_error_display_names_product() {
        let e = RemoteError::StageRejected {
            product: "cf".to_owned(),
            reason: "HTTP 422".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("cf"));
        assert!(msg.contains("422"));
    }
}
