// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_adapters::{FlinkClientError, FlinkOp, KubeClientError, KubeOp};
use kube::ResourceExt;

#[tokio::test]
async fn failed_runs_count_attempts() {
    let ctx = setup();
    ctx.tick().await;
    ctx.flink.fail(FlinkOp::ListActiveJobs, FlinkClientError::Timeout);

    let outcome = ctx.tick().await;

    assert_eq!(outcome.result, Some(ResultStatus::Failed));
    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert_eq!(outcome.task_status, TaskStatus::Executing);
    assert_eq!(ctx.status().task_attempts(), 1);
}

#[tokio::test]
async fn too_many_attempts_fail_task_and_halt_cluster() {
    let config = OperatorConfig::default().max_task_attempts(2);
    let ctx = setup_with(FlinkClusterSpec::builder().build(), config);
    ctx.tick().await;
    ctx.flink.fail(FlinkOp::ListActiveJobs, FlinkClientError::Timeout);

    ctx.tick().await;
    ctx.tick().await;
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert_eq!(outcome.task_status, TaskStatus::Failed);

    ctx.flink.clear_failure(FlinkOp::ListActiveJobs);
    let outcome = ctx.tick().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Failed);
    assert_eq!(
        ctx.status().task_sequence(),
        &[ClusterTask::StoppingCluster, ClusterTask::ClusterHalted]
    );

    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterHalted);
    assert_eq!(outcome.cluster_status, ClusterStatus::Failed);
}

#[tokio::test]
async fn failed_cluster_can_be_started_again() {
    let config = OperatorConfig::default().max_task_attempts(1);
    let ctx = setup_with(FlinkClusterSpec::builder().build(), config);
    ctx.tick().await;
    ctx.flink.fail(FlinkOp::SubmitJob, FlinkClientError::Connect("refused".to_string()));
    ctx.tick().await;
    assert_eq!(ctx.tick().await.task_status, TaskStatus::Failed);
    ctx.flink.clear_failure(FlinkOp::SubmitJob);
    let halted = ctx.settle().await;
    assert_eq!(halted.cluster_status, ClusterStatus::Failed);

    ctx.request(ManualAction::Start).await;
    let outcome = ctx.settle().await;

    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
}

#[tokio::test]
async fn ambiguous_savepoint_target_skips_savepoint() {
    let ctx = setup();
    ctx.running().await;
    ctx.flink.set_running_jobs(&["job-a", "job-b"]);

    ctx.request(ManualAction::TriggerSavepoint).await;
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::TriggerSavepoint);
    let outcome = ctx.tick().await;
    assert_eq!(outcome.result, Some(ResultStatus::Error));
    assert_eq!(outcome.task_status, TaskStatus::Failed);

    // Savepoint failures leave the job running
    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 0);
}

#[tokio::test]
async fn savepoint_without_result_is_retriggered() {
    let ctx = setup();
    ctx.running().await;
    ctx.flink.set_latest_savepoint(None);

    ctx.request(ManualAction::TriggerSavepoint).await;
    ctx.tick().await;
    ctx.tick().await;
    assert!(ctx.status().savepoint_request().is_some());

    let outcome = ctx.tick().await;
    assert_eq!(outcome.result, Some(ResultStatus::Failed));
    assert_eq!(ctx.status().savepoint_request(), None);

    ctx.flink.set_latest_savepoint(Some("file:/savepoints/savepoint-2"));
    ctx.settle().await;
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 2);
    assert_eq!(ctx.status().savepoint_path(), Some("file:/savepoints/savepoint-2"));
}

#[tokio::test]
async fn persistent_conflict_abandons_tick() {
    let ctx = setup();
    ctx.kube.fail(KubeOp::UpdateStatus, KubeClientError::Conflict("stale".to_string()));

    let err = ctx.reconciler.reconcile(&ctx.id).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(ctx.kube.count(KubeOp::UpdateStatus), 2);
    assert_eq!(ctx.stored().status, None);

    // The next tick starts over from the stored resource
    ctx.kube.clear_failure(KubeOp::UpdateStatus);
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert!(outcome.written);
}

#[tokio::test]
async fn write_between_read_and_status_update_keeps_triggered_savepoint() {
    let ctx = setup();
    ctx.running().await;
    ctx.request(ManualAction::TriggerSavepoint).await;
    ctx.tick().await;

    ctx.kube.interleave(KubeOp::UpdateStatus, &ctx.id, |cluster| {
        cluster.annotations_mut().insert("team".to_string(), "data".to_string());
    });
    let outcome = ctx.tick().await;

    assert!(outcome.written);
    assert_eq!(outcome.task, ClusterTask::TriggerSavepoint);
    let stored = ctx.stored();
    assert_eq!(stored.annotations().get("team").map(String::as_str), Some("data"));
    assert!(stored.status.unwrap().savepoint_request().is_some());

    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 1);
    assert_eq!(ctx.status().savepoint_request(), None);
}

#[tokio::test]
async fn unreadable_cluster_is_an_error() {
    let ctx = setup();
    ctx.kube.fail(KubeOp::GetCluster, KubeClientError::Api("unavailable".to_string()));

    let err = ctx.reconciler.reconcile(&ctx.id).await.unwrap_err();

    assert!(!err.is_conflict());
    assert_eq!(ctx.kube.count(KubeOp::UpdateStatus), 0);
}
