//! Fakenode Core - In-memory workload lifecycle simulator
//!
//! This crate is the bookkeeping layer behind a simulated compute node:
//! - fakenode-agent (node binary)
//! - orchestrator adapters (anything speaking the control-plane protocol)
//!
//! Key types:
//! - Provider (the fixed call surface: place, remove, get, describe, ping)
//! - NodeProvider trait (the same surface as an async interface)
//! - Workload, WorkloadStatus and TaskStatus records
//! - NodeDescriptor (capacity and addresses advertised by the node)
//! - Error types
//!
//! Nothing here runs a workload. Placed workloads are reported as running
//! immediately and reported as succeeded when removed.

pub mod error;
pub mod node;
pub mod notifier;
pub mod provider;
pub mod query;
pub mod store;
pub mod synth;
pub mod traits;
pub mod types;

pub use error::*;
pub use node::{NodeAddress, NodeAddressKind, NodeCondition, NodeConfig, NodeDescriptor, NodeInfo, ResourceList};
pub use notifier::{Notifier, WorkloadCallback};
pub use provider::Provider;
pub use query::WorkloadQuery;
pub use store::WorkloadStore;
pub use traits::*;
pub use types::*;
