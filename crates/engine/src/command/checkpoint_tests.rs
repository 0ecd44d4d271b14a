// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_core::test_support::{a_flink_cluster, a_flink_cluster_with};
use fop_core::{FakeClock, FlinkClusterSpec, ResultStatus};

const CYCLE: [ClusterTask; 3] =
    [ClusterTask::CreatingSavepoint, ClusterTask::TriggerSavepoint, ClusterTask::ClusterRunning];

fn running_cluster(cache: &ClusterCache, clock: &FakeClock) -> ClusterId {
    let id = cache.insert(a_flink_cluster("test", "flink"));
    cache.update(&id, |c| {
        let status = c.status_mut();
        status.set_task_status(TaskStatus::Idle, clock);
        status.set_cluster_status(ClusterStatus::Running, clock);
    });
    id
}

fn sequence(cache: &ClusterCache, id: &ClusterId) -> Vec<ClusterTask> {
    cache.get(id).unwrap().status.unwrap().task_sequence().to_vec()
}

#[tokio::test]
async fn idle_running_cluster_gets_savepoint_cycle() {
    let cache = ClusterCache::new();
    let clock = FakeClock::new();
    let id = running_cluster(&cache, &clock);

    let result = CheckpointingPlan::new(cache.clone(), clock).execute(&id, ()).await;

    assert_eq!(result, OperationResult::success(CYCLE.to_vec()));
    assert_eq!(sequence(&cache, &id), CYCLE.to_vec());
    let status = cache.get(&id).unwrap().status.unwrap();
    assert_eq!(status.current_task(), ClusterTask::CreatingSavepoint);
}

#[tokio::test]
async fn cycle_replaces_previous_plan() {
    let cache = ClusterCache::new();
    let clock = FakeClock::new();
    let id = running_cluster(&cache, &clock);
    cache.update(&id, |c| {
        c.status_mut().reset_tasks(
            &[ClusterTask::InitialiseCluster, ClusterTask::StartingCluster, ClusterTask::ClusterRunning],
            &clock,
        );
    });

    CheckpointingPlan::new(cache.clone(), clock).execute(&id, ()).await;

    assert_eq!(sequence(&cache, &id), CYCLE.to_vec());
}

#[yare::parameterized(
    executing = { TaskStatus::Executing, ClusterStatus::Running },
    awaiting  = { TaskStatus::Awaiting,  ClusterStatus::Running },
    failed    = { TaskStatus::Failed,    ClusterStatus::Running },
    starting  = { TaskStatus::Idle,      ClusterStatus::Starting },
    stopped   = { TaskStatus::Idle,      ClusterStatus::Stopped },
    checkpointing = { TaskStatus::Idle,  ClusterStatus::Checkpointing },
)]
fn waits_unless_idle_and_running(task_status: TaskStatus, cluster_status: ClusterStatus) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let cache = ClusterCache::new();
    let clock = FakeClock::new();
    let id = running_cluster(&cache, &clock);
    cache.update(&id, |c| {
        let status = c.status_mut();
        status.reset_tasks(&[ClusterTask::StartingCluster], &clock);
        status.set_task_status(task_status, &clock);
        status.set_cluster_status(cluster_status, &clock);
    });
    let before = cache.get(&id).unwrap();

    let result = runtime.block_on(CheckpointingPlan::new(cache.clone(), clock).execute(&id, ()));

    assert_eq!(result.status, ResultStatus::Await);
    assert_eq!(result.output, vec![ClusterTask::StartingCluster]);
    assert_eq!(cache.get(&id).unwrap(), before);
}

#[tokio::test]
async fn session_cluster_cannot_savepoint() {
    let cache = ClusterCache::new();
    let clock = FakeClock::new();
    let mut spec = FlinkClusterSpec::builder().build();
    spec.bootstrap = None;
    let id = cache.insert(a_flink_cluster_with("test", "flink", spec));
    cache.update(&id, |c| c.status_mut().set_cluster_status(ClusterStatus::Running, &clock));

    let result = CheckpointingPlan::new(cache.clone(), clock).execute(&id, ()).await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert!(sequence(&cache, &id).is_empty());
}

#[tokio::test]
async fn uncached_cluster_fails() {
    let result = CheckpointingPlan::new(ClusterCache::new(), FakeClock::new())
        .execute(&ClusterId::new("flink", "test"), ())
        .await;
    assert_eq!(result, OperationResult::failed(vec![]));
}
