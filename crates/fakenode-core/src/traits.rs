//! Core traits for Fakenode
//!
//! The NodeProvider trait is the surface an orchestrator adapter drives.
//! Adapters work through this interface ONLY - never the concrete provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::node::NodeDescriptor;
use crate::notifier::WorkloadCallback;
use crate::types::{Workload, WorkloadKey, WorkloadStatus};

/// Callback invoked with a read-only snapshot of the node
pub type NodeCallback = Arc<dyn Fn(&NodeDescriptor) + Send + Sync>;

/// Resource usage of one workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStats {
    pub key: WorkloadKey,
    pub cpu_nano_cores: u64,
    pub memory_bytes: u64,
}

/// Resource usage of the node and its workloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub node_name: String,
    pub captured_at: DateTime<Utc>,
    pub workloads: Vec<WorkloadStats>,
}

/// Node providers must implement this trait.
/// The adapter works through this interface ONLY.
#[async_trait]
pub trait NodeProvider: Send + Sync {
    /// Workload lifecycle
    async fn create_workload(&self, workload: Workload) -> Result<()>;
    async fn update_workload(&self, workload: Workload) -> Result<()>;
    async fn delete_workload(&self, key: &WorkloadKey) -> Result<()>;

    /// Workload queries (owned copies)
    async fn get_workload(&self, key: &WorkloadKey) -> Result<Workload>;
    async fn get_workload_status(&self, key: &WorkloadKey) -> Result<WorkloadStatus>;
    async fn list_workloads(&self) -> Result<Vec<Workload>>;

    /// Change notification (for status propagation)
    ///
    /// The workload callback runs synchronously inside the committing call
    /// and may itself create or delete workloads.
    fn notify_workloads(&self, callback: WorkloadCallback);
    fn notify_node_status(&self, callback: NodeCallback);

    /// Task access (for logs and exec)
    async fn container_logs(&self, key: &WorkloadKey, task: &str, tail: Option<u32>) -> Result<String>;
    async fn run_in_container(&self, key: &WorkloadKey, task: &str, command: &[String]) -> Result<()>;

    /// Node (for registration and heartbeat)
    fn configure_node(&self) -> NodeDescriptor;
    async fn ping(&self) -> Result<()>;
    async fn stats_summary(&self) -> Result<StatsSummary>;
}
