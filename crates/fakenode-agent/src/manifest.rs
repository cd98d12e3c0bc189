//! Startup workload manifests
//!
//! A manifest is a JSON array of workloads in the same shape the core
//! serializes them:
//!
//! ```json
//! [
//!   {
//!     "metadata": { "namespace": "default", "name": "w1" },
//!     "spec": { "tasks": [ { "name": "c1", "image": "busybox" } ] }
//!   }
//! ]
//! ```

use fakenode_core::Workload;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::error::{AgentError, Result};

/// Parse a manifest from JSON text
pub fn parse_manifest(json: &str) -> Result<Vec<Workload>> {
    let workloads: Vec<Workload> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for (i, workload) in workloads.iter().enumerate() {
        if workload.namespace().is_empty() || workload.name().is_empty() {
            return Err(AgentError::config(format!(
                "manifest entry {} needs both a namespace and a name",
                i
            )));
        }
        if workload.spec.tasks.is_empty() {
            return Err(AgentError::config(format!(
                "workload {} has no tasks",
                workload.key()
            )));
        }
        if !seen.insert(workload.key()) {
            warn!(workload = %workload.key(), "Duplicate manifest entry, the later one wins");
        }
    }

    Ok(workloads)
}

/// Load a manifest from a JSON file
pub fn load_manifest(path: &Path) -> Result<Vec<Workload>> {
    let json = std::fs::read_to_string(path)?;
    parse_manifest(&json)
}
