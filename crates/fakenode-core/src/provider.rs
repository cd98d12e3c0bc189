//! Simulated node provider
//!
//! Composes the store, synthesizer, notifier and node descriptor into the
//! call surface an orchestrator adapter drives:
//!
//! ```text
//! adapter ──place/remove──▶ Provider ──▶ WorkloadStore (+ synth)
//!         ──get/list──────▶          ──▶ WorkloadQuery
//!         ──describe──────▶          ──▶ node::describe
//!         ◀──callback────── Notifier ◀── every committed change
//! ```
//!
//! The provider never fails apart from lookups of unknown workloads, and it
//! never blocks on anything but its own locks.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::node::{self, NodeConfig, NodeDescriptor};
use crate::notifier::{Notifier, WorkloadCallback};
use crate::query::WorkloadQuery;
use crate::store::WorkloadStore;
use crate::traits::{NodeCallback, NodeProvider, StatsSummary, WorkloadStats};
use crate::types::{Workload, WorkloadKey, WorkloadStatus};

/// A node that accepts every workload and runs none of them
pub struct Provider {
    /// Static node configuration
    config: NodeConfig,

    /// Authoritative workload state
    store: Arc<WorkloadStore>,

    /// Observer of committed changes
    notifier: Notifier,

    /// Serializes commit + notify so the observer sees commit order;
    /// reentrant so the observer itself may place or remove
    commit: ReentrantMutex<()>,
}

impl Provider {
    /// Create a provider with an empty store and no observer
    pub fn new(config: NodeConfig) -> Self {
        info!(
            node = %config.node_name,
            internal_ip = %config.internal_ip,
            "Creating simulated node provider"
        );

        Self {
            config,
            store: Arc::new(WorkloadStore::new()),
            notifier: Notifier::new(),
            commit: ReentrantMutex::new(()),
        }
    }

    /// Place a workload; it is reported running immediately
    ///
    /// Replaces any workload with the same identity.
    pub fn place(&self, workload: Workload) {
        info!(
            workload = %workload.key(),
            tasks = workload.spec.tasks.len(),
            "Placing workload"
        );

        let _commit = self.commit.lock();
        let snapshot = self.store.place(workload);
        self.notifier.notify(&snapshot);
    }

    /// Accept an orchestrator-side update; the simulator is authoritative, so
    /// nothing changes
    pub fn update(&self, workload: &Workload) {
        info!(workload = %workload.key(), "Ignoring workload update");
    }

    /// Remove a workload; it is reported succeeded and then forgotten
    pub fn remove(&self, key: &WorkloadKey) -> Result<()> {
        info!(workload = %key, "Removing workload");

        let _commit = self.commit.lock();
        let snapshot = self.store.remove(key)?;
        self.notifier.notify(&snapshot);
        Ok(())
    }

    /// Copy of one workload
    pub fn get(&self, key: &WorkloadKey) -> Result<Workload> {
        debug!(workload = %key, "Getting workload");
        self.store.get(key)
    }

    /// Copy of one workload's status
    pub fn get_status(&self, key: &WorkloadKey) -> Result<WorkloadStatus> {
        debug!(workload = %key, "Getting workload status");
        self.store.get_status(key)
    }

    /// Copies of every workload, in no particular order
    pub fn list(&self) -> Vec<Workload> {
        debug!("Listing workloads");
        self.store.list()
    }

    /// Read-only view for adapters that only query
    pub fn query(&self) -> WorkloadQuery {
        WorkloadQuery::new(Arc::clone(&self.store))
    }

    /// Register the observer of workload changes, replacing any previous one
    ///
    /// The observer runs synchronously on the calling thread while changes
    /// are serialized. It may read from the provider, and a place or remove
    /// it issues is committed and delivered before the outer call returns.
    pub fn register<F>(&self, callback: F)
    where
        F: Fn(&Workload) + Send + Sync + 'static,
    {
        self.notifier.register(callback);
    }

    /// Describe the node for registration and status updates
    pub fn describe(&self) -> NodeDescriptor {
        debug!(node = %self.config.node_name, "Describing node");
        node::describe(&self.config)
    }

    /// Liveness check; the simulated node is always healthy
    pub fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Logs of a task; simulated tasks never write any
    pub fn container_logs(&self, key: &WorkloadKey, task: &str, tail: Option<u32>) -> String {
        debug!(workload = %key, task = %task, tail = ?tail, "Reading task logs");
        String::new()
    }

    /// Run a command in a task; accepted and discarded
    pub fn run_in_container(&self, key: &WorkloadKey, task: &str, command: &[String]) {
        debug!(workload = %key, task = %task, command = ?command, "Discarding exec request");
    }

    /// Usage summary; simulated workloads consume nothing
    pub fn stats_summary(&self) -> StatsSummary {
        let workloads = self
            .store
            .list()
            .into_iter()
            .map(|w| WorkloadStats {
                key: w.key(),
                cpu_nano_cores: 0,
                memory_bytes: 0,
            })
            .collect();

        StatsSummary {
            node_name: self.config.node_name.clone(),
            captured_at: Utc::now(),
            workloads,
        }
    }

    /// Static node configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Number of workloads currently placed
    pub fn workload_count(&self) -> usize {
        self.store.len()
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("node", &self.config.node_name)
            .field("workloads", &self.store.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[async_trait]
impl NodeProvider for Provider {
    async fn create_workload(&self, workload: Workload) -> Result<()> {
        self.place(workload);
        Ok(())
    }

    async fn update_workload(&self, workload: Workload) -> Result<()> {
        self.update(&workload);
        Ok(())
    }

    async fn delete_workload(&self, key: &WorkloadKey) -> Result<()> {
        self.remove(key)
    }

    async fn get_workload(&self, key: &WorkloadKey) -> Result<Workload> {
        self.get(key)
    }

    async fn get_workload_status(&self, key: &WorkloadKey) -> Result<WorkloadStatus> {
        self.get_status(key)
    }

    async fn list_workloads(&self) -> Result<Vec<Workload>> {
        Ok(self.list())
    }

    fn notify_workloads(&self, callback: WorkloadCallback) {
        self.notifier.register_arc(callback);
    }

    fn notify_node_status(&self, _callback: NodeCallback) {
        // The node never changes, so there is nothing to report
        debug!(node = %self.config.node_name, "Node status observer accepted");
    }

    async fn container_logs(&self, key: &WorkloadKey, task: &str, tail: Option<u32>) -> Result<String> {
        Ok(Provider::container_logs(self, key, task, tail))
    }

    async fn run_in_container(&self, key: &WorkloadKey, task: &str, command: &[String]) -> Result<()> {
        Provider::run_in_container(self, key, task, command);
        Ok(())
    }

    fn configure_node(&self) -> NodeDescriptor {
        self.describe()
    }

    async fn ping(&self) -> Result<()> {
        Provider::ping(self)
    }

    async fn stats_summary(&self) -> Result<StatsSummary> {
        Ok(Provider::stats_summary(self))
    }
}
