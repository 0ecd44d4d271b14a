// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::plans;
use fop_adapters::FlinkOp;
use fop_core::{OperatorSpec, SavepointMode};
use std::time::Duration;

fn spec_with(operator: OperatorSpec) -> FlinkClusterSpec {
    FlinkClusterSpec::builder().operator(operator).build()
}

fn manual_savepoints() -> FlinkClusterSpec {
    spec_with(OperatorSpec { savepoint_mode: SavepointMode::Manual, ..Default::default() })
}

#[yare::parameterized(
    automatic = { SavepointMode::Automatic, true },
    manual    = { SavepointMode::Manual, false },
)]
fn digest_change_restarts_cluster(mode: SavepointMode, savepoint: bool) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    runtime.block_on(async {
        let spec = spec_with(OperatorSpec { savepoint_mode: mode, ..Default::default() });
        let ctx = setup_with(spec, OperatorConfig::default());
        ctx.running().await;

        ctx.edit_spec(|spec| spec.job_manager.required_memory = Some("2Gi".to_string()));
        ctx.tick().await;

        assert_eq!(ctx.status().task_sequence(), plans::restart(savepoint).as_slice());
    });
}

#[tokio::test]
async fn restart_records_new_digests() {
    let ctx = setup_with(manual_savepoints(), OperatorConfig::default());
    ctx.running().await;
    let before = ctx.status().digests().clone();

    ctx.edit_spec(|spec| spec.task_manager.task_slots = 4);
    let outcome = ctx.settle().await;

    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    let status = ctx.status();
    assert_eq!(before.changed_sections(status.digests()), vec!["taskManager"]);
    assert_eq!(status.task_slots(), 4);

    // Nothing left to apply
    let outcome = ctx.tick().await;
    assert!(!outcome.written);
}

#[tokio::test]
async fn task_manager_count_change_rescales() {
    let ctx = setup_with(manual_savepoints(), OperatorConfig::default());
    ctx.running().await;

    ctx.edit_spec(|spec| spec.task_managers = 3);
    ctx.tick().await;
    assert_eq!(ctx.status().task_sequence(), plans::rescale(false).as_slice());

    let outcome = ctx.settle().await;
    assert_eq!(outcome.cluster_status, ClusterStatus::Running);
    assert_eq!(ctx.status().task_managers(), 3);
    let parallelism = ctx.flink.calls().into_iter().rev().find_map(|call| match call {
        fop_adapters::FlinkCall::SubmitJob { submission, .. } => Some(submission.parallelism),
        _ => None,
    });
    assert_eq!(parallelism, Some(3));
}

#[tokio::test]
async fn periodic_savepoint_when_interval_elapses() {
    let spec = spec_with(OperatorSpec { savepoint_interval: Some(60), ..Default::default() });
    let ctx = setup_with(spec, OperatorConfig::default());
    ctx.running().await;

    ctx.clock.advance(Duration::from_secs(30));
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::ClusterRunning);

    ctx.clock.advance(Duration::from_secs(31));
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::TriggerSavepoint);

    ctx.settle().await;
    assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 1);

    // The interval counts from the last savepoint
    let outcome = ctx.tick().await;
    assert_eq!(outcome.task, ClusterTask::ClusterRunning);
    assert_eq!(outcome.task_status, TaskStatus::Idle);
}

#[yare::parameterized(
    manual_mode  = { SavepointMode::Manual, Some(60) },
    no_interval  = { SavepointMode::Automatic, None },
    zero         = { SavepointMode::Automatic, Some(0) },
)]
fn no_periodic_savepoint(mode: SavepointMode, interval: Option<u64>) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    runtime.block_on(async {
        let operator =
            OperatorSpec { savepoint_mode: mode, savepoint_interval: interval, ..Default::default() };
        let ctx = setup_with(spec_with(operator), OperatorConfig::default());
        ctx.running().await;

        ctx.clock.advance(Duration::from_secs(3600));
        let outcome = ctx.tick().await;

        assert_eq!(outcome.task, ClusterTask::ClusterRunning);
        assert_eq!(ctx.flink.count(FlinkOp::TriggerSavepoint), 0);
    });
}

#[tokio::test]
async fn halted_cluster_ignores_drift() {
    let ctx = setup();
    ctx.running().await;
    ctx.request(ManualAction::Suspend).await;
    ctx.settle().await;

    ctx.edit_spec(|spec| spec.task_managers = 5);
    let outcome = ctx.tick().await;

    assert_eq!(outcome.task, ClusterTask::ClusterHalted);
    assert!(!outcome.written);
}
