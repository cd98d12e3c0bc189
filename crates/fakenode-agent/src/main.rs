//! Fakenode Agent - Simulated compute node
//!
//! Boots the in-memory workload simulator and keeps it alive:
//! - Configuration from flags, environment and an optional JSON file (config.rs)
//! - Startup workloads from a JSON manifest (manifest.rs)
//! - Liveness pings on a fixed interval (heartbeat.rs)
//!
//! Every workload transition is logged. On Ctrl-C, remaining workloads are
//! removed so their terminal transitions are reported before exit.
//!
//! Binary: fakenode-agent

use clap::Parser;
use fakenode_core::{Provider, Workload};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod heartbeat;
mod manifest;

use config::{AgentConfig, Overrides};
use heartbeat::HeartbeatMonitor;

/// Fakenode Agent - Simulated compute node
#[derive(Parser)]
#[command(name = "fakenode-agent")]
#[command(about = "Simulated compute node that accepts workloads and never runs them", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, env = "FAKENODE_CONFIG")]
    config: Option<PathBuf>,

    /// Node name
    #[arg(long, env = "FAKENODE_NODE_NAME")]
    node_name: Option<String>,

    /// Operating system reported for the node
    #[arg(long, env = "FAKENODE_OS")]
    operating_system: Option<String>,

    /// Internal IP reported for the node
    #[arg(long, env = "FAKENODE_INTERNAL_IP")]
    internal_ip: Option<String>,

    /// Node daemon endpoint port
    #[arg(long, env = "FAKENODE_DAEMON_PORT")]
    daemon_port: Option<u16>,

    /// Heartbeat interval (seconds)
    #[arg(long, env = "FAKENODE_HEARTBEAT_INTERVAL")]
    heartbeat_interval: Option<u64>,

    /// JSON manifest of workloads to place at startup
    #[arg(long, env = "FAKENODE_MANIFEST")]
    manifest: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> error::Result<AgentConfig> {
        let base = match &self.config {
            Some(path) => AgentConfig::load(path)?,
            None => AgentConfig::default(),
        };

        base.with_overrides(Overrides {
            node_name: self.node_name,
            operating_system: self.operating_system,
            internal_ip: self.internal_ip,
            daemon_port: self.daemon_port,
            heartbeat_interval_secs: self.heartbeat_interval,
            manifest: self.manifest,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fakenode_agent=info,fakenode_core=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config()?;

    info!("========================================");
    info!("Fakenode Agent starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Node: {}", config.node.node_name);
    info!("Heartbeat interval: {}s", config.heartbeat_interval_secs);
    info!("========================================");

    run(config).await?;

    info!("Fakenode Agent stopped");
    Ok(())
}

async fn run(config: AgentConfig) -> error::Result<()> {
    let provider = Arc::new(Provider::new(config.node.clone()));

    provider.register(|workload: &Workload| {
        info!(
            workload = %workload.key(),
            phase = %workload.phase(),
            tasks = workload.status.task_statuses.len(),
            "Workload transition"
        );
    });

    let descriptor = provider.describe();
    info!(
        node = %descriptor.node_name,
        cpu = descriptor.capacity.cpu,
        memory = %descriptor.capacity.memory_quantity(),
        pods = descriptor.capacity.pods,
        port = descriptor.daemon_endpoint_port,
        "Node ready"
    );
    debug!("Node descriptor: {}", serde_json::to_string(&descriptor)?);

    if let Some(path) = &config.manifest {
        let workloads = manifest::load_manifest(path)?;
        info!(path = %path.display(), count = workloads.len(), "Placing manifest workloads");
        for workload in workloads {
            provider.place(workload);
        }
    }

    let monitor = HeartbeatMonitor::new(Arc::clone(&provider), config.heartbeat_interval());
    let mut beats = monitor.beat_stream();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut first = true;

    loop {
        tokio::select! {
            beat = beats.next() => match beat {
                Some(beat) if first => {
                    first = false;
                    info!(
                        healthy = beat.healthy,
                        interval_secs = monitor.interval().as_secs(),
                        "Heartbeat active"
                    );
                }
                Some(beat) if beat.healthy => {
                    debug!(workloads = beat.workloads, at = %beat.at, "Heartbeat");
                }
                Some(beat) => {
                    warn!(at = %beat.at, "Heartbeat unhealthy");
                }
                None => break,
            },
            signal = &mut shutdown => {
                signal?;
                info!("Shutdown requested");
                break;
            }
        }
    }

    drain(&provider)
}

/// Remove every remaining workload so observers see its terminal state
fn drain(provider: &Provider) -> error::Result<()> {
    let workloads = provider.list();
    info!(count = workloads.len(), "Removing remaining workloads");

    for workload in workloads {
        let key = workload.key();
        match provider.remove(&key) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(workload = %key, "Workload already removed");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fakenode_core::{NodeConfig, WorkloadPhase};
    use std::sync::Mutex;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "fakenode-agent",
            "--node-name",
            "edge-9",
            "--internal-ip",
            "192.168.1.20",
            "--daemon-port",
            "10255",
            "--heartbeat-interval",
            "2",
        ]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.node.node_name, "edge-9");
        assert_eq!(config.node.internal_ip, "192.168.1.20");
        assert_eq!(config.node.daemon_port, 10255);
        assert_eq!(config.heartbeat_interval_secs, 2);
    }

    #[test]
    fn test_cli_rejects_bad_ip() {
        let cli = Cli::parse_from(["fakenode-agent", "--internal-ip", "nowhere"]);
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_drain_terminates_everything() {
        let provider = Provider::new(NodeConfig::default());
        provider.place(Workload::new("default", "w1").with_task("c1", "busybox"));
        provider.place(Workload::new("default", "w2").with_task("c1", "busybox"));

        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        provider.register(move |w: &Workload| sink.lock().unwrap().push(w.phase()));
        drain(&provider).unwrap();

        assert_eq!(*phases.lock().unwrap(), vec![WorkloadPhase::Succeeded; 2]);
        assert_eq!(provider.workload_count(), 0);
    }

    #[test]
    fn test_drain_continues_past_vanished_workload() {
        let provider = Arc::new(Provider::new(NodeConfig::default()));
        for name in ["w1", "w2", "w3"] {
            provider.place(Workload::new("default", name).with_task("c1", "busybox"));
        }

        // Whichever workload drains first removes the others behind drain's back
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let inner = Arc::clone(&provider);
        provider.register(move |w: &Workload| {
            sink.lock().unwrap().push(w.name().to_string());
            if w.phase() == WorkloadPhase::Succeeded && inner.workload_count() == 2 {
                let others = inner.list();
                inner.remove(&others[0].key()).unwrap();
            }
        });
        drain(&provider).unwrap();

        assert_eq!(phases.lock().unwrap().len(), 3);
        assert_eq!(provider.workload_count(), 0);
    }
}
