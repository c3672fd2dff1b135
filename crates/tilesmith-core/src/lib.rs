//! Assembly and submission of product configuration.
//!
//! This crate turns a validated `DeploymentConfig` and a network placement into
//! the three documents the orchestration API expects (`assemble`), and drives
//! the stage-then-configure workflow against any `OpsManagerApi` through the
//! `Configurator` state machine.

pub mod assemble;
pub mod lifecycle;
pub mod workflow;

pub use assemble::{assemble, AssembleError, AssembledDocuments, AssemblySummary};
pub use lifecycle::{validate_transition, ConfigureState};
pub use workflow::{configure_product, Configurator};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Remote(#[from] tilesmith_remote::RemoteError),
    #[error("invalid workflow transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

#[cfg(test)]
pub(crate) mod fixtures {
    use tilesmith_schema::{parse_config_str, DeploymentConfig};

    pub(crate) fn sample_config() -> DeploymentConfig {
        parse_config_str(
            r#"
apps_domain = "apps.example.com"
sys_domain = "sys.example.com"
ssl_certificate = "CERT"
ssl_private_key = "KEY"
tcp_port_range = "1024-1123"
external_sql_host = "10.0.0.5"
external_sql_port = 3306
sql_username = "admin"
sql_password = "secret123"
tcp_target_pool = "tcp-pool"
wss_target_pool = "wss-pool"
ssh_target_pool = "ssh-pool"
http_backend_service = "http-backend"
subnet_name = "ert"
zones = ["z1", "z2"]
"#,
        )
        .unwrap()
    }
}
