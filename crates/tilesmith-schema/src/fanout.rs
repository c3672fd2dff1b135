//! Credential fan-out: one database user shared by many service roles.
//!
//! The product expects a username/password pair per dependent service. A
//! single physical database user backs all of them, so each table below is
//! expanded from one [`DatabaseCredentials`] value. Adding a service is a
//! one-line edit to the relevant table.

use crate::properties::PropertyCatalog;
use crate::value::TypedValue;

/// A dependent service whose credentials live under a database root path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutTarget {
    /// Symbolic name used for catalog entries (`<service>_username`).
    pub service: &'static str,
    /// Path stem used by the remote schema (`<stem>_username`).
    pub stem: &'static str,
}

const fn target(service: &'static str, stem: &'static str) -> FanoutTarget {
    FanoutTarget { service, stem }
}

pub const SYSTEM_DATABASE_ROOT: &str = ".properties.system_database";
pub const UAA_DATABASE_ROOT: &str = ".properties.uaa_database";

pub const SYSTEM_DATABASE_SERVICES: &[FanoutTarget] = &[
    target("app_usage", "app_usage_service"),
    target("autoscale", "autoscale"),
    target("cloud_controller", "ccdb"),
    target("diego", "diego"),
    target("locket", "locket"),
    target("network_policy_server", "networkpolicyserver"),
    target("nfs", "nfsvolume"),
    target("notifications", "notifications"),
    target("account", "account"),
    target("routing", "routing"),
    target("silk", "silk"),
];

pub const UAA_DATABASE_SERVICES: &[FanoutTarget] = &[target("uaa", "uaa")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseCredentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// An external database block: choice marker, host, port, then one credential
/// pair per target.
#[derive(Debug, Clone, Copy)]
pub struct ExternalDatabase<'a> {
    /// Symbolic prefix, e.g. `system_database`.
    pub name: &'static str,
    /// Schema root, e.g. `.properties.system_database`.
    pub root: &'static str,
    pub choice: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub targets: &'static [FanoutTarget],
}

impl ExternalDatabase<'_> {
    pub fn push_into(&self, catalog: &mut PropertyCatalog, credentials: DatabaseCredentials<'_>) {
        let external = format!("{}.external", self.root);
        catalog.push(self.name, self.root, TypedValue::plain(self.choice));
        catalog.push(
            format!("{}_host", self.name),
            format!("{external}.host"),
            TypedValue::plain(self.host),
        );
        catalog.push(
            format!("{}_port", self.name),
            format!("{external}.port"),
            TypedValue::Integer(i64::from(self.port)),
        );
        fan_out_credentials(catalog, &external, self.targets, credentials);
    }
}

/// Push a username and a password entry for every target under `prefix`.
pub fn fan_out_credentials(
    catalog: &mut PropertyCatalog,
    prefix: &str,
    targets: &[FanoutTarget],
    credentials: DatabaseCredentials<'_>,
) {
    for t in targets {
        catalog.push(
            format!("{}_username", t.service),
            format!("{prefix}.{}_username", t.stem),
            TypedValue::plain(credentials.username),
        );
        catalog.push(
            format!("{}_password", t.service),
            format!("{prefix}.{}_password", t.stem),
            TypedValue::secret(credentials.password),
        );
    }
}
