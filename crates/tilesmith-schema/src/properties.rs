//! The property catalog: an ordered registry of (name, schema path, value).
//!
//! [`PropertyCatalog::build`] is the single place that binds every logical
//! property to its remote schema path. The serialized document is a JSON object
//! keyed by schema path, in catalog order.

use crate::config::DeploymentConfig;
use crate::defaults::PlatformDefaults;
use crate::fanout::{
    DatabaseCredentials, ExternalDatabase, SYSTEM_DATABASE_ROOT, SYSTEM_DATABASE_SERVICES,
    UAA_DATABASE_ROOT, UAA_DATABASE_SERVICES,
};
use crate::value::TypedValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate schema path in property catalog: {0}")]
    DuplicatePath(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Symbolic name, for lookup and diagnostics. Not sent to the remote.
    pub name: String,
    /// Dotted path in the remote product's property tree.
    pub path: String,
    pub value: TypedValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCatalog {
    entries: Vec<PropertyEntry>,
}

impl PropertyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full catalog for one configure run.
    ///
    /// Inputs are expected to have passed [`DeploymentConfig::validate`].
    pub fn build(cfg: &DeploymentConfig, defaults: &PlatformDefaults) -> Self {
        let mut c = Self::new();

        // Domains
        c.push(
            "apps_domain",
            ".cloud_controller.apps_domain",
            TypedValue::plain(&cfg.apps_domain),
        );
        c.push(
            "sys_domain",
            ".cloud_controller.system_domain",
            TypedValue::plain(&cfg.sys_domain),
        );

        // Networking
        c.push(
            "networking_point_of_entry",
            ".properties.networking_point_of_entry",
            TypedValue::plain(&defaults.networking_point_of_entry),
        );
        c.push(
            "tcp_routing",
            ".properties.tcp_routing",
            TypedValue::plain(&defaults.tcp_routing),
        );
        c.push(
            "tcp_routing_reservable_ports",
            ".properties.tcp_routing.enable.reservable_ports",
            TypedValue::plain(&cfg.tcp_port_range),
        );
        c.push(
            "gorouter_ssl_ciphers",
            ".properties.gorouter_ssl_ciphers",
            TypedValue::plain(&defaults.gorouter_ssl_ciphers),
        );
        c.push(
            "haproxy_ssl_ciphers",
            ".properties.haproxy_ssl_ciphers",
            TypedValue::plain(&defaults.haproxy_ssl_ciphers),
        );
        c.push(
            "skip_ssl_verification",
            ".ha_proxy.skip_cert_verify",
            TypedValue::Boolean(defaults.skip_ssl_verification),
        );
        c.push(
            "haproxy_forward_tls",
            ".properties.haproxy_forward_tls",
            TypedValue::plain(&defaults.haproxy_forward_tls),
        );
        c.push(
            "ingress_certificates",
            ".properties.networking_poe_ssl_cert",
            TypedValue::certificate(&cfg.ssl_certificate, &cfg.ssl_private_key),
        );

        // Application containers and security groups
        c.push(
            "container_dns_servers",
            ".diego_cell.dns_servers",
            TypedValue::plain(&defaults.container_dns_servers),
        );
        c.push(
            "security_acknowledgement",
            ".properties.security_acknowledgement",
            TypedValue::plain(&defaults.security_acknowledgement),
        );

        // UAA
        c.push(
            "service_provider_credentials",
            ".uaa.service_provider_key_credentials",
            TypedValue::certificate(&cfg.ssl_certificate, &cfg.ssl_private_key),
        );

        let credentials = DatabaseCredentials {
            username: &cfg.sql_username,
            password: &cfg.sql_password,
        };
        for (name, root, targets) in [
            ("uaa_database", UAA_DATABASE_ROOT, UAA_DATABASE_SERVICES),
            ("system_database", SYSTEM_DATABASE_ROOT, SYSTEM_DATABASE_SERVICES),
        ] {
            ExternalDatabase {
                name,
                root,
                choice: &defaults.database_choice,
                host: &cfg.external_sql_host,
                port: cfg.external_sql_port,
                targets,
            }
            .push_into(&mut c, credentials);
        }

        c.push(
            "mysql_monitor_recipient_email",
            ".mysql_monitor.recipient_email",
            TypedValue::plain(&defaults.mysql_monitor_recipient_email),
        );

        c
    }

    pub fn push(&mut self, name: impl Into<String>, path: impl Into<String>, value: TypedValue) {
        self.entries.push(PropertyEntry {
            name: name.into(),
            path: path.into(),
            value,
        });
    }

    pub fn entries(&self) -> &[PropertyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_by_path(&self, path: &str) -> Option<&PropertyEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Return the first schema path that appears more than once.
    pub fn first_duplicate_path(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.path.as_str())
            .find(|p| !seen.insert(*p))
    }

    /// Render the properties document.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        if let Some(path) = self.first_duplicate_path() {
            return Err(CatalogError::DuplicatePath(path.to_owned()));
        }
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for PropertyCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.path, &entry.value)?;
        }
        map.end()
    }
}

/// Decode a properties document back into path → value pairs.
pub fn decode_properties(json: &str) -> Result<BTreeMap<String, TypedValue>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}
