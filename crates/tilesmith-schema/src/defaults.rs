use serde::{Deserialize, Serialize};

pub const DEFAULT_GOROUTER_CIPHERS: &str =
    "ECDHE-RSA-AES128-GCM-SHA256:ECDHE-RSA-AES256-GCM-SHA384";
pub const DEFAULT_HAPROXY_CIPHERS: &str = "DHE-RSA-AES128-GCM-SHA256:DHE-RSA-AES256-GCM-SHA384:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-RSA-AES256-GCM-SHA384";

/// Platform settings that are not taken from the user configuration.
///
/// Every field has a built-in value; a `[defaults]` table in the deployment
/// config may override any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformDefaults {
    pub networking_point_of_entry: String,
    pub tcp_routing: String,
    pub gorouter_ssl_ciphers: String,
    pub haproxy_ssl_ciphers: String,
    pub skip_ssl_verification: bool,
    pub haproxy_forward_tls: String,
    /// Comma-separated resolver list handed to application containers.
    pub container_dns_servers: String,
    pub security_acknowledgement: String,
    pub database_choice: String,
    pub mysql_monitor_recipient_email: String,
    pub tcp_router_instances: Option<u32>,
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self {
            networking_point_of_entry: "external_non_ssl".to_owned(),
            tcp_routing: "enable".to_owned(),
            gorouter_ssl_ciphers: DEFAULT_GOROUTER_CIPHERS.to_owned(),
            haproxy_ssl_ciphers: DEFAULT_HAPROXY_CIPHERS.to_owned(),
            skip_ssl_verification: true,
            haproxy_forward_tls: "disable".to_owned(),
            container_dns_servers: "8.8.8.8,8.8.4.4".to_owned(),
            security_acknowledgement: "X".to_owned(),
            database_choice: "external".to_owned(),
            mysql_monitor_recipient_email: "admin@example.org".to_owned(),
            tcp_router_instances: Some(3),
        }
    }
}
