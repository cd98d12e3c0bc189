//! Read-only view over the workload store
//!
//! Adapters that only need to answer "what runs here" hold a
//! [`WorkloadQuery`] instead of the store itself.

use std::sync::Arc;

use crate::error::Result;
use crate::store::WorkloadStore;
use crate::types::{Workload, WorkloadKey, WorkloadStatus};

/// Narrow read surface over a shared [`WorkloadStore`]
///
/// Every accessor returns an owned copy.
#[derive(Debug, Clone)]
pub struct WorkloadQuery {
    store: Arc<WorkloadStore>,
}

impl WorkloadQuery {
    pub fn new(store: Arc<WorkloadStore>) -> Self {
        Self { store }
    }

    /// Get one workload by identity
    pub fn get(&self, key: &WorkloadKey) -> Result<Workload> {
        self.store.get(key)
    }

    /// Get the status of one workload by identity
    pub fn get_status(&self, key: &WorkloadKey) -> Result<WorkloadStatus> {
        self.store.get_status(key)
    }

    /// Get every workload, in no particular order
    pub fn list(&self) -> Vec<Workload> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkloadPhase;

    #[test]
    fn test_query_reads_through_store() {
        let store = Arc::new(WorkloadStore::new());
        let query = WorkloadQuery::new(Arc::clone(&store));
        let key = WorkloadKey::new("default", "w1");

        assert!(query.get(&key).unwrap_err().is_not_found());
        assert!(query.list().is_empty());

        store.place(Workload::new("default", "w1").with_task("c1", "busybox"));

        assert_eq!(query.get(&key).unwrap().phase(), WorkloadPhase::Running);
        assert_eq!(query.get_status(&key).unwrap().phase, WorkloadPhase::Running);
        assert_eq!(query.list().len(), 1);
    }
}
