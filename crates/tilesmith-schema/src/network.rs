use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Placement of a product's jobs: the network they join and the availability
/// zones they are spread over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub singleton_availability_zone: NamedRef,
    pub other_availability_zones: Vec<NamedRef>,
    pub network: NamedRef,
}

impl NetworkDescriptor {
    /// Resolve placement for a subnet. The first zone hosts singleton jobs;
    /// every zone, including the first, is used for balanced jobs.
    ///
    /// Returns `None` when `zones` is empty.
    pub fn for_subnet(subnet: &str, zones: &[String]) -> Option<Self> {
        let first = zones.first()?;
        Some(Self {
            singleton_availability_zone: NamedRef::new(first),
            other_availability_zones: zones.iter().map(NamedRef::new).collect(),
            network: NamedRef::new(subnet),
        })
    }
}
