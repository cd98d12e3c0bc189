//! In-memory workload store
//!
//! The store is the single source of truth for what runs on the simulated
//! node. Every read and write goes through one exclusive lock, and every
//! value handed out is an owned copy, so callers can never observe or cause
//! a change to a record after the fact.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{NodeError, Result};
use crate::synth::{synthesize_running, synthesize_terminated};
use crate::types::{Workload, WorkloadKey, WorkloadStatus};

/// Mapping from workload identity to its current record
#[derive(Debug, Default)]
pub struct WorkloadStore {
    workloads: Mutex<HashMap<WorkloadKey, Workload>>,
}

impl WorkloadStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a workload, marking it running
    ///
    /// An existing record under the same identity is replaced (last write
    /// wins). Returns a snapshot of the committed record.
    pub fn place(&self, mut workload: Workload) -> Workload {
        workload.status = synthesize_running(&workload.spec);
        let key = workload.key();

        let mut workloads = self.workloads.lock();
        if let Some(previous) = workloads.insert(key.clone(), workload.clone()) {
            debug!(
                workload = %key,
                previous_tasks = previous.spec.tasks.len(),
                "Replaced existing workload"
            );
        }

        workload
    }

    /// Remove a workload, marking it succeeded
    ///
    /// Returns a snapshot of the terminated record, which is no longer held.
    pub fn remove(&self, key: &WorkloadKey) -> Result<Workload> {
        let mut workloads = self.workloads.lock();
        let mut workload = workloads
            .remove(key)
            .ok_or_else(|| NodeError::not_found(key))?;
        drop(workloads);

        workload.status = synthesize_terminated(&workload.status);
        Ok(workload)
    }

    /// Copy of the record for `key`
    pub fn get(&self, key: &WorkloadKey) -> Result<Workload> {
        self.workloads
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| NodeError::not_found(key))
    }

    /// Copy of the status for `key`
    pub fn get_status(&self, key: &WorkloadKey) -> Result<WorkloadStatus> {
        self.workloads
            .lock()
            .get(key)
            .map(|w| w.status.clone())
            .ok_or_else(|| NodeError::not_found(key))
    }

    /// Copies of every record, in no particular order
    pub fn list(&self) -> Vec<Workload> {
        self.workloads.lock().values().cloned().collect()
    }

    /// Whether a record exists for `key`
    pub fn contains(&self, key: &WorkloadKey) -> bool {
        self.workloads.lock().contains_key(key)
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.workloads.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.lock().is_empty()
    }
}
