//! Per-job resource descriptors overlaid on the product's default sizing.
//!
//! Only jobs that are explicitly set appear in the resources document. Anything
//! absent keeps whatever the remote side already has.

use crate::config::DeploymentConfig;
use crate::defaults::PlatformDefaults;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unknown job '{0}'")]
    UnknownJob(String),
    #[error("job '{0}' is already set")]
    DuplicateJob(String),
    #[error("invalid load balancer binding '{0}', expected 'tcp:<pool>' or 'http:<backend>'")]
    InvalidBinding(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Every job the product's resource schema knows about.
pub const PLATFORM_JOBS: &[&str] = &[
    "tcp_router",
    "router",
    "diego_brain",
    "consul_server",
    "nats",
    "nfs_server",
    "mysql_proxy",
    "mysql",
    "backup-prepare",
    "diego_database",
    "uaa",
    "cloud_controller",
    "ha_proxy",
    "mysql_monitor",
    "clock_global",
    "cloud_controller_worker",
    "diego_cell",
    "loggregator_trafficcontroller",
    "syslog_adapter",
    "syslog_scheduler",
    "doppler",
    "smoke-tests",
    "push-apps-manager",
    "notifications",
    "notifications-ui",
    "push-pivotal-account",
    "push-usage-service",
    "autoscaling",
    "autoscaling-register-broker",
    "nfsbrokerpush",
    "bootstrap",
    "mysql-rejoin-unsafe",
];

pub fn is_known_job(job: &str) -> bool {
    PLATFORM_JOBS.contains(&job)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingProtocol {
    Tcp,
    Http,
}

impl BindingProtocol {
    fn prefix(self) -> &'static str {
        match self {
            BindingProtocol::Tcp => "tcp",
            BindingProtocol::Http => "http",
        }
    }
}

/// A target pool (TCP) or backend service (HTTP) a job registers with.
/// Serialized as `<protocol>:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LoadBalancerBinding {
    pub protocol: BindingProtocol,
    pub pool: String,
}

impl LoadBalancerBinding {
    pub fn tcp(pool: impl Into<String>) -> Self {
        Self {
            protocol: BindingProtocol::Tcp,
            pool: pool.into(),
        }
    }

    pub fn http(pool: impl Into<String>) -> Self {
        Self {
            protocol: BindingProtocol::Http,
            pool: pool.into(),
        }
    }
}

impl fmt::Display for LoadBalancerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol.prefix(), self.pool)
    }
}

impl FromStr for LoadBalancerBinding {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResourceError::InvalidBinding(s.to_owned());
        let (prefix, pool) = s.split_once(':').ok_or_else(invalid)?;
        if pool.is_empty() {
            return Err(invalid());
        }
        match prefix {
            "tcp" => Ok(Self::tcp(pool)),
            "http" => Ok(Self::http(pool)),
            _ => Err(invalid()),
        }
    }
}

impl From<LoadBalancerBinding> for String {
    fn from(b: LoadBalancerBinding) -> Self {
        b.to_string()
    }
}

impl TryFrom<String> for LoadBalancerBinding {
    type Error = ResourceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "elb_names", default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<LoadBalancerBinding>,
    /// `None` keeps the remote default; `Some(0)` is sent as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(default)]
    pub internet_connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    jobs: Vec<(String, Resource)>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the resource overlay: the TCP router, the HTTP/WSS router, and
    /// the SSH-capable brain. All other jobs are left to the remote default.
    pub fn build(cfg: &DeploymentConfig, defaults: &PlatformDefaults) -> Self {
        let mut set = Self::new();
        set.jobs.push((
            "tcp_router".to_owned(),
            Resource {
                bindings: vec![LoadBalancerBinding::tcp(&cfg.tcp_target_pool)],
                instances: defaults.tcp_router_instances,
                internet_connected: false,
            },
        ));
        set.jobs.push((
            "router".to_owned(),
            Resource {
                bindings: vec![
                    LoadBalancerBinding::tcp(&cfg.wss_target_pool),
                    LoadBalancerBinding::http(&cfg.http_backend_service),
                ],
                instances: None,
                internet_connected: false,
            },
        ));
        set.jobs.push((
            "diego_brain".to_owned(),
            Resource {
                bindings: vec![LoadBalancerBinding::tcp(&cfg.ssh_target_pool)],
                instances: None,
                internet_connected: false,
            },
        ));
        set
    }

    pub fn set(&mut self, job: &str, resource: Resource) -> Result<(), ResourceError> {
        if !is_known_job(job) {
            return Err(ResourceError::UnknownJob(job.to_owned()));
        }
        if self.get(job).is_some() {
            return Err(ResourceError::DuplicateJob(job.to_owned()));
        }
        self.jobs.push((job.to_owned(), resource));
        Ok(())
    }

    pub fn get(&self, job: &str) -> Option<&Resource> {
        self.jobs.iter().find(|(j, _)| j == job).map(|(_, r)| r)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.jobs.iter().map(|(j, _)| j.as_str())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Render the resources document.
    pub fn to_json(&self) -> Result<String, ResourceError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ResourceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.jobs.len()))?;
        for (job, resource) in &self.jobs {
            map.serialize_entry(job, resource)?;
        }
        map.end()
    }
}

pub fn decode_resources(json: &str) -> Result<BTreeMap<String, Resource>, ResourceError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use serde_json::{json, Value};

    fn sample_set() -> ResourceSet {
        let cfg = sample_config();
        ResourceSet::build(&cfg, &cfg.defaults)
    }

    #[test]
    fn build_sets_exactly_three_known_jobs() {
        let set = sample_set();
        let jobs: Vec<&str> = set.jobs().collect();
        assert_eq!(jobs, vec!["tcp_router", "router", "diego_brain"]);
        assert!(jobs.iter().all(|j| is_known_job(j)));
    }

    #[test]
    fn tcp_router_binds_tcp_pool() {
        let set = sample_set();
        let r = set.get("tcp_router").unwrap();
        assert_eq!(r.bindings, vec![LoadBalancerBinding::tcp("pcf-cf-tcp")]);
        assert_eq!(r.instances, Some(3));
        assert!(!r.internet_connected);
    }

    #[test]
    fn router_binds_wss_and_http() {
        let set = sample_set();
        let names: Vec<String> = set
            .get("router")
            .unwrap()
            .bindings
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["tcp:pcf-cf-wss", "http:pcf-httpslb"]);
    }

    #[test]
    fn brain_binds_only_ssh_pool() {
        let set = sample_set();
        let r = set.get("diego_brain").unwrap();
        assert_eq!(r.bindings.len(), 1);
        assert_eq!(r.bindings[0].protocol, BindingProtocol::Tcp);
        assert_eq!(r.bindings[0].pool, "pcf-cf-ssh");
    }

    #[test]
    fn document_shape_and_omission_rules() {
        let doc: Value = serde_json::from_str(&sample_set().to_json().unwrap()).unwrap();
        assert_eq!(
            doc,
            json!({
                "tcp_router": {"elb_names": ["tcp:pcf-cf-tcp"], "instances": 3, "internet_connected": false},
                "router": {"elb_names": ["tcp:pcf-cf-wss", "http:pcf-httpslb"], "internet_connected": false},
                "diego_brain": {"elb_names": ["tcp:pcf-cf-ssh"], "internet_connected": false},
            })
        );
    }

    #[test]
    fn explicit_zero_instances_is_kept() {
        let r = Resource {
            bindings: Vec::new(),
            instances: Some(0),
            internet_connected: false,
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"instances": 0, "internet_connected": false})
        );
    }

    #[test]
    fn set_rejects_unknown_and_duplicate_jobs() {
        let mut set = ResourceSet::new();
        assert!(matches!(
            set.set("not_a_job", Resource::default()),
            Err(ResourceError::UnknownJob(_))
        ));
        set.set("nats", Resource::default()).unwrap();
        assert!(matches!(
            set.set("nats", Resource::default()),
            Err(ResourceError::DuplicateJob(_))
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn binding_parsing() {
        assert_eq!(
            "tcp:pool".parse::<LoadBalancerBinding>().unwrap(),
            LoadBalancerBinding::tcp("pool")
        );
        assert_eq!(
            "http:svc".parse::<LoadBalancerBinding>().unwrap(),
            LoadBalancerBinding::http("svc")
        );
        assert!("udp:pool".parse::<LoadBalancerBinding>().is_err());
        assert!("tcp:".parse::<LoadBalancerBinding>().is_err());
        assert!("pool".parse::<LoadBalancerBinding>().is_err());
    }

    #[test]
    fn decode_recovers_resources() {
        let set = sample_set();
        let decoded = decode_resources(&set.to_json().unwrap()).unwrap();
        assert_eq!(decoded.len(), 3);
        for job in set.jobs() {
            assert_eq!(decoded.get(job), set.get(job), "{job}");
        }
    }

    #[test]
    fn platform_jobs_are_unique() {
        let mut jobs = PLATFORM_JOBS.to_vec();
        jobs.sort_unstable();
        jobs.dedup();
        assert_eq!(jobs.len(), PLATFORM_JOBS.len());
    }
}
