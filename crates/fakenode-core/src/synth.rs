//! Synthetic status generation
//!
//! A placed workload is reported as running the moment it arrives; a removed
//! workload is reported as having succeeded. Both transitions are computed
//! here as pure functions of their input and the current time.

use chrono::{DateTime, Utc};

use crate::types::{
    ConditionKind, ConditionStatus, TaskState, TaskStatus, WorkloadCondition, WorkloadPhase,
    WorkloadSpec, WorkloadStatus,
};

/// Address reported for every simulated workload. Not routable.
pub const SIMULATED_POD_ADDRESS: &str = "1.2.3.4";

/// Workload reason set on removal
pub const WORKLOAD_DELETED_REASON: &str = "WorkloadDeleted";

/// Task reason set on removal
pub const CONTAINER_DELETED_REASON: &str = "ContainerDeleted";

/// Conditions reported for a running workload, in order
const RUNNING_CONDITIONS: [ConditionKind; 3] = [
    ConditionKind::Initialized,
    ConditionKind::Ready,
    ConditionKind::Scheduled,
];

/// Running status for a freshly placed workload, stamped with the wall clock
pub fn synthesize_running(spec: &WorkloadSpec) -> WorkloadStatus {
    synthesize_running_at(spec, Utc::now())
}

/// Running status for a freshly placed workload, stamped with `now`
///
/// One task status per task definition, in submission order.
pub fn synthesize_running_at(spec: &WorkloadSpec, now: DateTime<Utc>) -> WorkloadStatus {
    let conditions = RUNNING_CONDITIONS
        .iter()
        .map(|&kind| WorkloadCondition {
            kind,
            status: ConditionStatus::True,
            last_heartbeat: Some(now),
            last_transition: Some(now),
        })
        .collect();

    let task_statuses = spec
        .tasks
        .iter()
        .map(|task| TaskStatus {
            name: task.name.clone(),
            image: task.image.clone(),
            ready: true,
            restart_count: 0,
            state: TaskState::Running { started_at: now },
        })
        .collect();

    WorkloadStatus {
        phase: WorkloadPhase::Running,
        host_address: String::new(),
        pod_address: SIMULATED_POD_ADDRESS.to_string(),
        start_time: Some(now),
        reason: None,
        conditions,
        task_statuses,
    }
}

/// Terminated status for a workload being removed, stamped with the wall clock
///
/// # Panics
///
/// Panics if any task is not running. Only statuses produced by
/// [`synthesize_running`] may be terminated.
pub fn synthesize_terminated(status: &WorkloadStatus) -> WorkloadStatus {
    synthesize_terminated_at(status, Utc::now())
}

/// Terminated status for a workload being removed, stamped with `now`
///
/// # Panics
///
/// Panics if any task is not running.
pub fn synthesize_terminated_at(status: &WorkloadStatus, now: DateTime<Utc>) -> WorkloadStatus {
    let task_statuses = status
        .task_statuses
        .iter()
        .map(|task| {
            let started_at = match &task.state {
                TaskState::Running { started_at } => *started_at,
                TaskState::Terminated { .. } => {
                    panic!("task {} terminated twice", task.name)
                }
            };

            TaskStatus {
                ready: false,
                state: TaskState::Terminated {
                    started_at,
                    // A skewed clock must not finish a task before it started
                    finished_at: now.max(started_at),
                    reason: CONTAINER_DELETED_REASON.to_string(),
                    message: String::new(),
                },
                ..task.clone()
            }
        })
        .collect();

    WorkloadStatus {
        phase: WorkloadPhase::Succeeded,
        reason: Some(WORKLOAD_DELETED_REASON.to_string()),
        task_statuses,
        ..status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskSpec;
    use chrono::Duration;

    fn spec() -> WorkloadSpec {
        WorkloadSpec {
            tasks: vec![TaskSpec::new("c1", "busybox"), TaskSpec::new("c2", "nginx")],
            node_name: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-17T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_running_status_shape() {
        let status = synthesize_running_at(&spec(), t0());

        assert_eq!(status.phase, WorkloadPhase::Running);
        assert_eq!(status.pod_address, SIMULATED_POD_ADDRESS);
        assert_eq!(status.host_address, "");
        assert_eq!(status.start_time, Some(t0()));
        assert_eq!(status.reason, None);

        let kinds: Vec<_> = status.conditions.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ConditionKind::Initialized, ConditionKind::Ready, ConditionKind::Scheduled]
        );
        assert_eq!(
            status.condition(ConditionKind::Ready).map(|c| c.status),
            Some(ConditionStatus::True)
        );
        assert!(status.conditions.iter().all(|c| c.status == ConditionStatus::True
            && c.last_heartbeat == Some(t0())
            && c.last_transition == Some(t0())));
    }

    #[test]
    fn test_running_tasks_mirror_spec() {
        let status = synthesize_running_at(&spec(), t0());

        let names: Vec<_> = status.task_statuses.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "c2"]);
        assert_eq!(status.task_statuses[1].image, "nginx");
        for task in &status.task_statuses {
            assert!(task.ready);
            assert_eq!(task.restart_count, 0);
            assert_eq!(task.state, TaskState::Running { started_at: t0() });
        }
    }

    #[test]
    fn test_running_without_tasks() {
        let status = synthesize_running_at(&WorkloadSpec::default(), t0());
        assert_eq!(status.phase, WorkloadPhase::Running);
        assert!(status.task_statuses.is_empty());
    }

    #[test]
    fn test_terminated_status() {
        let running = synthesize_running_at(&spec(), t0());
        let later = t0() + Duration::seconds(42);
        let terminated = synthesize_terminated_at(&running, later);

        assert_eq!(terminated.phase, WorkloadPhase::Succeeded);
        assert_eq!(terminated.reason.as_deref(), Some(WORKLOAD_DELETED_REASON));
        assert_eq!(terminated.pod_address, SIMULATED_POD_ADDRESS);
        assert_eq!(terminated.start_time, Some(t0()));
        assert_eq!(terminated.conditions, running.conditions);
        assert_eq!(terminated.task_statuses.len(), 2);

        for task in &terminated.task_statuses {
            assert!(!task.ready);
            assert_eq!(
                task.state,
                TaskState::Terminated {
                    started_at: t0(),
                    finished_at: later,
                    reason: CONTAINER_DELETED_REASON.to_string(),
                    message: String::new(),
                }
            );
        }
    }

    #[test]
    fn test_terminated_never_finishes_before_start() {
        let running = synthesize_running_at(&spec(), t0());
        let earlier = t0() - Duration::seconds(5);
        let terminated = synthesize_terminated_at(&running, earlier);

        for task in &terminated.task_statuses {
            match &task.state {
                TaskState::Terminated { started_at, finished_at, .. } => {
                    assert!(finished_at >= started_at)
                }
                other => panic!("unexpected state {:?}", other),
            }
        }
    }

    #[test]
    fn test_wall_clock_variants_are_monotonic() {
        let running = synthesize_running(&spec());
        let terminated = synthesize_terminated(&running);

        for task in &terminated.task_statuses {
            match &task.state {
                TaskState::Terminated { started_at, finished_at, .. } => {
                    assert!(finished_at >= started_at)
                }
                other => panic!("unexpected state {:?}", other),
            }
        }
    }

    #[test]
    #[should_panic(expected = "terminated twice")]
    fn test_terminating_twice_panics() {
        let running = synthesize_running_at(&spec(), t0());
        let terminated = synthesize_terminated_at(&running, t0());
        synthesize_terminated_at(&terminated, t0());
    }
}
