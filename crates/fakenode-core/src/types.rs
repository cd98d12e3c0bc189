//! Core types shared across Fakenode components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a workload on this node: namespace plus name
///
/// The pair is hashed as a whole, so no namespace/name combination can
/// collide with another one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkloadKey {
    pub namespace: String,
    pub name: String,
}

impl WorkloadKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for WorkloadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Object metadata submitted with a workload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadMeta {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// A single task (container) definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub name: String,
    pub image: String,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// Workload specification as submitted by the orchestrator
///
/// Opaque to the simulator apart from the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

/// Coarse lifecycle stage of a workload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadPhase {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl WorkloadPhase {
    /// Succeeded and Failed are final
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for WorkloadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadPhase::Pending => write!(f, "Pending"),
            WorkloadPhase::Running => write!(f, "Running"),
            WorkloadPhase::Succeeded => write!(f, "Succeeded"),
            WorkloadPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Workload condition types reported by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Initialized,
    Ready,
    Scheduled,
}

/// Tri-state condition status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

/// A workload condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadCondition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub status: ConditionStatus,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub last_transition: Option<DateTime<Utc>>,
}

/// State of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TaskState {
    Running {
        started_at: DateTime<Utc>,
    },
    Terminated {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        reason: String,
        message: String,
    },
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }

    /// When the task started, whichever state it is in
    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            Self::Running { started_at } | Self::Terminated { started_at, .. } => *started_at,
        }
    }
}

/// Status of one task, in task submission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: u32,
    pub state: TaskState,
}

/// Observed status of a workload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStatus {
    pub phase: WorkloadPhase,
    #[serde(default)]
    pub host_address: String,
    #[serde(default)]
    pub pod_address: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub conditions: Vec<WorkloadCondition>,
    #[serde(default)]
    pub task_statuses: Vec<TaskStatus>,
}

impl WorkloadStatus {
    /// Look up a condition by kind
    pub fn condition(&self, kind: ConditionKind) -> Option<&WorkloadCondition> {
        self.conditions.iter().find(|c| c.kind == kind)
    }
}

/// A workload record: what was submitted plus what the node reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    pub metadata: WorkloadMeta,
    #[serde(default)]
    pub spec: WorkloadSpec,
    #[serde(default)]
    pub status: WorkloadStatus,
}

impl Workload {
    /// Create an empty workload with the given identity
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: WorkloadMeta {
                namespace: namespace.into(),
                name: name.into(),
                labels: BTreeMap::new(),
            },
            ..Default::default()
        }
    }

    /// Append a task definition
    pub fn with_task(mut self, name: impl Into<String>, image: impl Into<String>) -> Self {
        self.spec.tasks.push(TaskSpec::new(name, image));
        self
    }

    /// Set a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Set the node this workload was scheduled onto
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.spec.node_name = Some(node_name.into());
        self
    }

    /// Identity of this workload
    pub fn key(&self) -> WorkloadKey {
        WorkloadKey::new(&self.metadata.namespace, &self.metadata.name)
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn phase(&self) -> WorkloadPhase {
        self.status.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = WorkloadKey::new("default", "w1");
        assert_eq!(key.to_string(), "default/w1");
    }

    #[test]
    fn test_keys_do_not_collide_on_separator() {
        // "a-b"/"c" and "a"/"b-c" share a naive "-" join
        let a = WorkloadKey::new("a-b", "c");
        let b = WorkloadKey::new("a", "b-c");
        assert_ne!(a, b);
    }

    #[test]
    fn test_workload_builder() {
        let workload = Workload::new("default", "w1")
            .with_task("c1", "busybox")
            .with_task("c2", "nginx:1.27")
            .with_label("app", "demo")
            .with_node_name("fakenode");

        assert_eq!(workload.key(), WorkloadKey::new("default", "w1"));
        assert_eq!(workload.spec.tasks.len(), 2);
        assert_eq!(workload.spec.tasks[1].image, "nginx:1.27");
        assert_eq!(workload.metadata.labels.get("app"), Some(&"demo".to_string()));
        assert_eq!(workload.spec.node_name.as_deref(), Some("fakenode"));
        assert_eq!(workload.phase(), WorkloadPhase::Pending);
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!WorkloadPhase::Pending.is_terminal());
        assert!(!WorkloadPhase::Running.is_terminal());
        assert!(WorkloadPhase::Succeeded.is_terminal());
        assert!(WorkloadPhase::Failed.is_terminal());
    }

    #[test]
    fn test_workload_deserialization_defaults() {
        let json = r#"{
            "metadata": { "namespace": "default", "name": "w1" },
            "spec": { "tasks": [ { "name": "c1", "image": "busybox" } ] }
        }"#;

        let workload: Workload = serde_json::from_str(json).unwrap();
        assert_eq!(workload.key().to_string(), "default/w1");
        assert_eq!(workload.spec.tasks[0].name, "c1");
        assert_eq!(workload.status, WorkloadStatus::default());
    }

    #[test]
    fn test_task_state_serialization() {
        let started_at = DateTime::parse_from_rfc3339("2024-01-17T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let state = TaskState::Running { started_at };

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"running":{"startedAt":"2024-01-17T10:30:00Z"}}"#);
    }
}
