//! Resource model and the compile-time kind registry.
//!
//! The set of spec variants is closed per build: adding a kind means adding
//! a [`ResourceSpec`] variant together with a [`Record`] impl. Higher-level
//! code indexes the store by the string kind while typed call sites go
//! through [`Record`] for compile-time guarantees on the record shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind identifier for network interface records.
pub const KIND_NETWORK_INTERFACE: &str = "NetworkInterface";

/// Kind identifier for DHCP client records.
pub const KIND_DHCP_CLIENT: &str = "DHCPClient";

/// Metadata common to every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Name, unique within a kind.
    pub name: String,
    /// Kind tag; must agree with the spec variant.
    pub kind: String,
    /// Writer attribution; empty means unowned.
    #[serde(default)]
    pub owner: String,
    /// Bumped by the store on every effective update.
    #[serde(default)]
    pub generation: u64,
    /// Tokens that block deletion until removed.
    #[serde(default)]
    pub finalizers: Vec<String>,
    /// Free-form identifying metadata, uninterpreted by the store.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Free-form non-identifying metadata, uninterpreted by the store.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// A network link as declared or observed on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceSpec {
    pub interface_name: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
}

/// DHCP client configuration for one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpClientSpec {
    pub interface_ref: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Closed set of typed spec variants, one per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceSpec {
    NetworkInterface(NetworkInterfaceSpec),
    #[serde(rename = "DHCPClient")]
    DhcpClient(DhcpClientSpec),
}

impl ResourceSpec {
    /// The stable kind tag of this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkInterface(_) => KIND_NETWORK_INTERFACE,
            Self::DhcpClient(_) => KIND_DHCP_CLIENT,
        }
    }
}

/// A record type registered against a kind.
///
/// Implementations form the compile-time registry: an unregistered type
/// simply does not implement the trait and fails to compile at the call
/// site.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {
    /// Stable kind identifier for this record type.
    const KIND: &'static str;

    /// Borrow the typed spec out of a variant, if it matches.
    fn from_spec(spec: &ResourceSpec) -> Option<&Self>;

    /// Wrap the record into its variant.
    fn into_spec(self) -> ResourceSpec;
}

/// The kind string registered for `T`.
pub fn kind_of<T: Record>() -> &'static str {
    T::KIND
}

impl Record for NetworkInterfaceSpec {
    const KIND: &'static str = KIND_NETWORK_INTERFACE;

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::NetworkInterface(inner) => Some(inner),
            _ => None,
        }
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::NetworkInterface(self)
    }
}

impl Record for DhcpClientSpec {
    const KIND: &'static str = KIND_DHCP_CLIENT;

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::DhcpClient(inner) => Some(inner),
            _ => None,
        }
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::DhcpClient(self)
    }
}

/// A resource addressable by `(kind, name)`.
///
/// All fields are owned data, so `Clone` is a deep copy and `PartialEq` is
/// deep structural equality over metadata and spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub metadata: Metadata,
    pub spec: ResourceSpec,
}

impl Resource {
    /// Build a fresh envelope around a typed record.
    ///
    /// The metadata carries only the kind and name; generation, owner and
    /// finalizers are left at their defaults.
    pub fn from_record<T: Record>(name: impl Into<String>, record: T) -> Self {
        Self {
            metadata: Metadata {
                name: name.into(),
                kind: T::KIND.to_string(),
                ..Metadata::default()
            },
            spec: record.into_spec(),
        }
    }

    /// The resource's kind tag.
    pub fn kind(&self) -> &str {
        &self.metadata.kind
    }

    /// The resource's name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Borrow the typed spec, if this resource holds a `T`.
    pub fn extract<T: Record>(&self) -> Option<&T> {
        T::from_spec(&self.spec)
    }
}
