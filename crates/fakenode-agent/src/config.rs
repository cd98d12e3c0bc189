//! Agent configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. An optional JSON config file
//! 3. Command-line flags (which also read `FAKENODE_*` environment variables)

use fakenode_core::NodeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AgentError, Result};

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Node advertised to the orchestrator
    #[serde(default)]
    pub node: NodeConfig,

    /// Interval between liveness pings (seconds)
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Workloads to place at startup
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

fn default_heartbeat_interval_secs() -> u64 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            manifest: None,
        }
    }
}

/// Values set on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub node_name: Option<String>,
    pub operating_system: Option<String>,
    pub internal_ip: Option<String>,
    pub daemon_port: Option<u16>,
    pub heartbeat_interval_secs: Option<u64>,
    pub manifest: Option<PathBuf>,
}

impl AgentConfig {
    /// Parse a config from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Apply overrides on top of this config
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(node_name) = overrides.node_name {
            self.node.node_name = node_name;
        }
        if let Some(operating_system) = overrides.operating_system {
            self.node.operating_system = operating_system;
        }
        if let Some(internal_ip) = overrides.internal_ip {
            self.node.internal_ip = internal_ip;
        }
        if let Some(port) = overrides.daemon_port {
            self.node.daemon_port = port;
        }
        if let Some(secs) = overrides.heartbeat_interval_secs {
            self.heartbeat_interval_secs = secs;
        }
        if overrides.manifest.is_some() {
            self.manifest = overrides.manifest;
        }

        self.validate()?;
        Ok(self)
    }

    /// Interval between liveness pings
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.node.node_name.trim().is_empty() {
            return Err(AgentError::config("node name must not be empty"));
        }
        if self.node.internal_ip.parse::<std::net::IpAddr>().is_err() {
            return Err(AgentError::config(format!(
                "internal IP {:?} is not an IP address",
                self.node.internal_ip
            )));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(AgentError::config("heartbeat interval must be at least 1 second"));
        }
        Ok(())
    }
}
