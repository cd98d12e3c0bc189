//! Node advertisement
//!
//! The simulated node advertises near-unlimited capacity so the orchestrator
//! schedules onto it freely. Everything here is derived from static
//! configuration on each call; nothing is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ConditionStatus;

/// Advertised CPU count
pub const NODE_CPU_CAPACITY: u64 = 2000;

/// Advertised memory, 8 TiB
pub const NODE_MEMORY_CAPACITY_BYTES: u64 = 8 * 1024 * 1024 * 1024 * 1024;

/// Advertised maximum number of workloads
pub const NODE_POD_CAPACITY: u64 = 4000;

/// Static node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// Name the node registers under
    #[serde(default = "default_node_name")]
    pub node_name: String,

    /// Operating system reported to the orchestrator
    #[serde(default = "default_operating_system")]
    pub operating_system: String,

    /// Internal address reported to the orchestrator
    #[serde(default = "default_internal_ip")]
    pub internal_ip: String,

    /// Port of the node daemon endpoint
    #[serde(default = "default_daemon_port")]
    pub daemon_port: u16,

    /// Version string reported in node info
    #[serde(default = "default_agent_version")]
    pub agent_version: String,
}

fn default_node_name() -> String {
    "fakenode".to_string()
}

fn default_operating_system() -> String {
    "Linux".to_string()
}

fn default_internal_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_daemon_port() -> u16 {
    10250
}

fn default_agent_version() -> String {
    format!("fakenode-{}", env!("CARGO_PKG_VERSION"))
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            operating_system: default_operating_system(),
            internal_ip: default_internal_ip(),
            daemon_port: default_daemon_port(),
            agent_version: default_agent_version(),
        }
    }
}

impl NodeConfig {
    /// Create a config for the named node
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    /// Set operating system
    pub fn with_operating_system(mut self, operating_system: impl Into<String>) -> Self {
        self.operating_system = operating_system.into();
        self
    }

    /// Set internal IP
    pub fn with_internal_ip(mut self, internal_ip: impl Into<String>) -> Self {
        self.internal_ip = internal_ip.into();
        self
    }

    /// Set daemon endpoint port
    pub fn with_daemon_port(mut self, port: u16) -> Self {
        self.daemon_port = port;
        self
    }

    /// Set reported version
    pub fn with_agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = version.into();
        self
    }
}

/// Resource quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    pub cpu: u64,
    pub memory_bytes: u64,
    pub pods: u64,
}

impl ResourceList {
    /// The oversized capacity every simulated node advertises
    pub fn simulated() -> Self {
        Self {
            cpu: NODE_CPU_CAPACITY,
            memory_bytes: NODE_MEMORY_CAPACITY_BYTES,
            pods: NODE_POD_CAPACITY,
        }
    }

    /// Memory in binary-suffix quantity notation, e.g. `8Ti`
    pub fn memory_quantity(&self) -> String {
        const SUFFIXES: [&str; 6] = ["Ei", "Pi", "Ti", "Gi", "Mi", "Ki"];

        for (i, suffix) in SUFFIXES.iter().enumerate() {
            let unit = 1u64 << (10 * (SUFFIXES.len() - i));
            if self.memory_bytes >= unit && self.memory_bytes % unit == 0 {
                return format!("{}{}", self.memory_bytes / unit, suffix);
            }
        }
        self.memory_bytes.to_string()
    }
}

/// A node condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ConditionStatus,
    pub last_heartbeat: DateTime<Utc>,
    pub last_transition: DateTime<Utc>,
    pub reason: String,
    pub message: String,
}

/// Kind of node address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAddressKind {
    #[serde(rename = "InternalIP")]
    InternalIp,
    Hostname,
}

/// A node address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub kind: NodeAddressKind,
    pub address: String,
}

/// Node system information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub operating_system: String,
    pub agent_version: String,
}

/// Everything the node advertises about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub node_name: String,
    pub capacity: ResourceList,
    pub allocatable: ResourceList,
    pub conditions: Vec<NodeCondition>,
    pub addresses: Vec<NodeAddress>,
    pub daemon_endpoint_port: u16,
    pub node_info: NodeInfo,
}

impl NodeDescriptor {
    /// Whether the node reports itself ready
    pub fn is_ready(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| c.kind == "Ready" && c.status == ConditionStatus::True)
    }
}

/// Describe the node, stamping conditions with the wall clock
pub fn describe(config: &NodeConfig) -> NodeDescriptor {
    describe_at(config, Utc::now())
}

/// Describe the node, stamping conditions with `now`
pub fn describe_at(config: &NodeConfig, now: DateTime<Utc>) -> NodeDescriptor {
    let capacity = ResourceList::simulated();

    NodeDescriptor {
        node_name: config.node_name.clone(),
        capacity,
        allocatable: capacity,
        conditions: vec![NodeCondition {
            kind: "Ready".to_string(),
            status: ConditionStatus::True,
            last_heartbeat: now,
            last_transition: now,
            reason: "KubeletReady".to_string(),
            message: "kubelet is ready.".to_string(),
        }],
        addresses: vec![NodeAddress {
            kind: NodeAddressKind::InternalIp,
            address: config.internal_ip.clone(),
        }],
        daemon_endpoint_port: config.daemon_port,
        node_info: NodeInfo {
            operating_system: config.operating_system.clone(),
            agent_version: config.agent_version.clone(),
        },
    }
}
