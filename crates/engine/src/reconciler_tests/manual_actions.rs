// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{RequestClusterStop, StopOptions};
use fop_adapters::{FlinkOp, KubeOp};
use fop_core::ManualActionAnnotation;

async fn stop(ctx: &TestContext, options: StopOptions) {
    let command = RequestClusterStop::new(ctx.kube.clone(), ctx.clock.clone());
    assert!(command.execute(&ctx.id, options).await.is_success());
}

#[tokio::test]
async fn suspend_without_savepoint_halts_cluster() {
    let ctx = setup();
    ctx.running().await;

    stop(&ctx, StopOptions { delete_resources: false, without_savepoint: true }).await;
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::StoppingCluster);
    assert_eq!(ctx.status().task_sequence(), crate::plans::stop(false).as_slice());

    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterHalted);
    assert_eq!(outcome.cluster_status, ClusterStatus::Suspended);
    assert!(ctx.flink.running_jobs().is_empty());
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 0);
}

#[tokio::test]
async fn stop_takes_savepoint_first() {
    let ctx = setup();
    ctx.running().await;

    ctx.request(ManualAction::Stop).await;
    ctx.tick().await;
    assert_eq!(ctx.status().task_sequence(), crate::plans::stop(true).as_slice());

    let outcome = ctx.settle().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Stopped);
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 1);
    assert_eq!(ctx.status().savepoint_path(), Some("file:/savepoints/savepoint-1"));
}

#[tokio::test]
async fn terminate_deletes_resources() {
    let ctx = setup();
    ctx.running().await;

    stop(&ctx, StopOptions { delete_resources: true, without_savepoint: false }).await;
    let outcome = ctx.settle().await;

    assert_eq!(outcome.cluster_status, ClusterStatus::Terminated);
    assert_eq!(ctx.kube.count(KubeOp::DeleteClusterResources), 1);
    // Deleting resources never waits for a savepoint
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 0);
}

#[tokio::test]
async fn action_is_processed_once() {
    let ctx = setup();
    ctx.running().await;
    stop(&ctx, StopOptions { delete_resources: false, without_savepoint: true }).await;
    ctx.settle().await;

    let processed = ManualActionAnnotation::of(&ctx.stored()).timestamp;
    assert_eq!(ctx.status().action_timestamp(), processed);

    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::ClusterHalted);
    assert!(!outcome.written);
}

#[tokio::test]
async fn start_restarts_halted_cluster() {
    let ctx = setup();
    ctx.running().await;
    stop(&ctx, StopOptions { delete_resources: false, without_savepoint: true }).await;
    ctx.settle().await;

    ctx.request(ManualAction::Start).await;
    let outcome = ctx.settle().await;

    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.count(FlinkOp::SubmitJob), 2);
}

#[tokio::test]
async fn start_of_running_cluster_is_ignored() {
    let ctx = setup();
    ctx.running().await;

    ctx.request(ManualAction::Start).await;
    let outcome = ctx.tick().await;

    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(outcome.task_status, TaskStatus::Idle);
    assert_eq!(ctx.status().action_timestamp(), ManualActionAnnotation::of(&ctx.stored()).timestamp);
}

#[tokio::test]
async fn start_waits_for_stop_to_finish() {
    let ctx = setup();
    ctx.running().await;
    stop(&ctx, StopOptions { delete_resources: false, without_savepoint: true }).await;
    ctx.tick().await;

    ctx.request(ManualAction::Start).await;
    let outcome = ctx.tick().await;
    assert!(outcome.cluster_status == ClusterStatus::Stopping);
    assert!(ctx.status().action_timestamp() < ManualActionAnnotation::of(&ctx.stored()).timestamp);

    // The pending start applies once the cluster has halted
    let outcome = ctx.settle().await;
    assert_eq!(outcome.task, ClusterTask::ClusterHalted);
    let outcome = ctx.settle().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
}

#[tokio::test]
async fn trigger_savepoint_runs_savepoint_cycle() {
    let ctx = setup();
    ctx.running().await;

    ctx.request(ManualAction::TriggerSavepoint).await;
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::TriggerSavepoint);
    assert_eq!(outcome.cluster_status, ClusterStatus::Checkpointing);
    assert_eq!(ctx.status().task_sequence(), crate::plans::checkpoint().as_slice());

    let outcome = ctx.settle().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 1);
    assert_eq!(ctx.status().savepoint_path(), Some("file:/savepoints/savepoint-1"));
}

#[tokio::test]
async fn trigger_savepoint_stays_pending_while_starting() {
    let ctx = setup();
    ctx.tick().await;

    ctx.request(ManualAction::TriggerSavepoint).await;
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::StartingCluster);
    assert_eq!(ctx.status().action_timestamp(), 0);

    ctx.settle().await;
    // The first tick at rest installs the savepoint cycle
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::TriggerSavepoint);
}

#[tokio::test]
async fn forget_savepoint_clears_path() {
    let ctx = setup();
    ctx.running().await;
    ctx.request(ManualAction::TriggerSavepoint).await;
    ctx.settle().await;
    assert!(ctx.status().savepoint_path().is_some());

    ctx.request(ManualAction::ForgetSavepoint).await;
    let outcome = ctx.tick().await;

    assert!(outcome.written);
    assert_eq!(ctx.status().savepoint_path(), None);
}
