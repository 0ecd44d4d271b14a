// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_adapters::{FlinkCall, FlinkOp, KubeOp};

#[tokio::test]
async fn new_cluster_gets_start_plan() {
    let ctx = setup();

    let outcome = ctx.tick().await;

    // InitialiseCluster completes within the first tick
    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert_eq!(outcome.task_status, TaskStatus::Executing);
    assert_eq!(outcome.cluster_status, ClusterStatus::Starting);
    assert_eq!(outcome.result, Some(ResultStatus::Success));
    assert!(outcome.written);

    let status = ctx.status();
    assert_eq!(status.task_sequence(), crate::plans::start().as_slice());
    assert!(!status.digests().is_empty());
    assert_eq!((status.task_managers(), status.task_slots()), (1, 1));
}

#[tokio::test]
async fn start_submits_job_then_settles_running() {
    let ctx = setup();

    ctx.tick().await;
    let submitted = ctx.tick().await;
    assert_eq!(submitted.task, ClusterTask::StartingCluster);
    assert_eq!(submitted.task_status, TaskStatus::Awaiting);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 1);

    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.running_jobs().len(), 1);
    assert_eq!(ctx.status().task_attempts(), 0);
}

#[tokio::test]
async fn start_waits_out_a_job_still_cancelling() {
    let ctx = setup();
    ctx.flink.set_job_state("leftover", "CANCELLING");

    ctx.tick().await;
    let waiting = ctx.tick().await;
    assert_eq!(waiting.task, ClusterTask::StartingCluster);
    assert_eq!(waiting.task_status, TaskStatus::Awaiting);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 0);

    ctx.flink.set_job_state("leftover", "CANCELED");
    let outcome = ctx.settle().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 1);
    assert_eq!(ctx.flink.active_jobs().len(), 1);
}

#[tokio::test]
async fn session_cluster_starts_without_submitting() {
    let mut spec = FlinkClusterSpec::builder().build();
    spec.bootstrap = None;
    let ctx = setup_with(spec, OperatorConfig::default());

    let outcome = ctx.settle().await;

    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 0);
}

#[tokio::test]
async fn resting_cluster_is_not_written() {
    let ctx = setup();
    ctx.running().await;
    let writes = ctx.kube.count(KubeOp::UpdateStatus);

    let outcome = ctx.tick().await;

    assert!(!outcome.written);
    assert_eq!(outcome.result, None);
    assert_eq!(ctx.kube.count(KubeOp::UpdateStatus), writes);
}

#[tokio::test]
async fn status_survives_a_fresh_cache() {
    let ctx = setup();
    ctx.tick().await;

    // A restarted operator rebuilds its cache from the stored status
    let deps = OperatorDeps {
        kube: ctx.kube.clone(),
        flink: ctx.flink.clone(),
        clock: ctx.clock.clone(),
        cache: ClusterCache::new(),
    };
    let reconciler = Reconciler::new(deps, OperatorConfig::default());
    let outcome = reconciler.reconcile(&ctx.id).await.unwrap();

    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert_eq!(outcome.task_status, TaskStatus::Awaiting);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 1);
}

#[tokio::test]
async fn restart_restores_from_savepoint_taken_before_stopping() {
    let ctx = setup();
    ctx.running().await;

    ctx.edit_spec(|spec| spec.runtime.image = "flink:1.10".to_string());
    let outcome = ctx.settle().await;

    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    let status = ctx.status();
    assert_eq!(status.savepoint_path(), Some("file:/savepoints/savepoint-1"));
    assert_eq!(status.savepoint_request(), None);
    let restored = ctx.flink.calls().into_iter().any(|call| {
        matches!(call, FlinkCall::SubmitJob { submission, .. }
            if submission.savepoint_path.as_deref() == Some("file:/savepoints/savepoint-1"))
    });
    assert!(restored);
    assert_eq!(ctx.flink.count(FlinkOp::CancelJob), 1);
}

#[tokio::test]
async fn unknown_cluster_is_an_error() {
    let ctx = setup();

    let err = ctx.reconciler.reconcile(&ClusterId::new("flink", "missing")).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Kube(fop_adapters::KubeClientError::NotFound(_))));
}
