//! Liveness heartbeat
//!
//! Pings the provider on a fixed interval, the way an orchestrator keeps a
//! node marked ready. The simulated node always answers, so every beat is
//! healthy unless the provider itself changes.

use chrono::{DateTime, Utc};
use fakenode_core::Provider;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

/// Result of one ping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heartbeat {
    /// When the ping completed
    pub at: DateTime<Utc>,

    /// Whether the provider answered
    pub healthy: bool,

    /// Workloads placed at the time of the ping
    pub workloads: usize,
}

/// Periodic pinger for a provider
pub struct HeartbeatMonitor {
    provider: Arc<Provider>,
    interval: Duration,
}

impl HeartbeatMonitor {
    /// Create a monitor pinging every `interval`
    pub fn new(provider: Arc<Provider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Start continuous pinging
    ///
    /// Returns a pinned stream yielding one `Heartbeat` per tick. The first
    /// tick fires immediately.
    pub fn beat_stream(&self) -> Pin<Box<dyn futures::Stream<Item = Heartbeat> + Send>> {
        let provider = Arc::clone(&self.provider);
        let interval_duration = self.interval;

        Box::pin(async_stream::stream! {
            let mut ticker = interval(interval_duration);
            loop {
                ticker.tick().await;
                yield beat(&provider);
            }
        })
    }

    /// Configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

fn beat(provider: &Provider) -> Heartbeat {
    let healthy = provider.ping().is_ok();
    debug!(node = %provider.config().node_name, healthy, "Ping");

    Heartbeat {
        at: Utc::now(),
        healthy,
        workloads: provider.workload_count(),
    }
}
