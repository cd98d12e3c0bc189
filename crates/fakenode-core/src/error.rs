//! Error types for Fakenode

use thiserror::Error;

use crate::types::WorkloadKey;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Core error type for simulator operations
///
/// The simulator never performs I/O, so the only failure is asking about a
/// workload it does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("Workload not found: {0}")]
    NotFound(WorkloadKey),
}

impl NodeError {
    /// Create a not-found error for a workload identity
    pub fn not_found(key: &WorkloadKey) -> Self {
        Self::NotFound(key.clone())
    }

    /// Whether this error reports a missing workload
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = NodeError::not_found(&WorkloadKey::new("default", "w1"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Workload not found: default/w1");
    }
}
