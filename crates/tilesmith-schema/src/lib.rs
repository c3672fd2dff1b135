//! Typed configuration model for staged platform products.
//!
//! This crate defines the schema layer: typed property values (`TypedValue`)
//! and their wire shapes, the ordered property catalog (`PropertyCatalog`)
//! with its credential fan-out tables, per-job resource descriptors
//! (`ResourceSet`), platform defaults, network placement, and the TOML
//! deployment config (`DeploymentConfig`).

pub mod config;
pub mod defaults;
pub mod fanout;
pub mod network;
pub mod properties;
pub mod resources;
pub mod value;

pub use config::{
    parse_config_file, parse_config_str, parse_port_range, ConfigError, DeploymentConfig,
    ProductSection,
};
pub use defaults::PlatformDefaults;
pub use fanout::{
    fan_out_credentials, DatabaseCredentials, ExternalDatabase, FanoutTarget,
    SYSTEM_DATABASE_SERVICES, UAA_DATABASE_SERVICES,
};
pub use network::{NamedRef, NetworkDescriptor};
pub use properties::{decode_properties, CatalogError, PropertyCatalog, PropertyEntry};
pub use resources::{
    decode_resources, is_known_job, BindingProtocol, LoadBalancerBinding, Resource,
    ResourceError, ResourceSet, PLATFORM_JOBS,
};
pub use value::{CertificatePair, TypedValue, ValueKind};
