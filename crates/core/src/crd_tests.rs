// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use kube::Resource;

#[test]
fn minimal_spec_fills_defaults() {
    let spec: FlinkClusterSpec =
        serde_json::from_value(serde_json::json!({ "runtime": { "image": "flink:1.9" } }))
            .unwrap();

    assert_eq!(spec.task_managers, 1);
    assert_eq!(spec.task_manager.task_slots, 1);
    assert_eq!(spec.operator.savepoint_mode, SavepointMode::Automatic);
    assert!(spec.bootstrap.is_none());
}

#[test]
fn parallelism_is_managers_times_slots() {
    let spec = FlinkClusterSpec::builder()
        .task_managers(3)
        .task_manager(TaskManagerSpec { task_slots: 4, ..Default::default() })
        .build();
    assert_eq!(spec.parallelism(), 12);
}

#[test]
fn parallelism_saturates_on_overflow() {
    let spec = FlinkClusterSpec::builder()
        .task_managers(i32::MAX)
        .task_manager(TaskManagerSpec { task_slots: 2, ..Default::default() })
        .build();
    assert_eq!(spec.parallelism(), i32::MAX);
}

#[test]
fn bootstrap_reads_camel_case() {
    let spec: FlinkClusterSpec = serde_json::from_value(serde_json::json!({
        "bootstrap": { "jarId": "abc_job.jar", "className": "com.example.Main", "arguments": ["--x"] }
    }))
    .unwrap();

    let bootstrap = spec.bootstrap.unwrap();
    assert_eq!(bootstrap.jar_id, "abc_job.jar");
    assert_eq!(bootstrap.class_name, "com.example.Main");
    assert_eq!(bootstrap.arguments, vec!["--x".to_string()]);
}

#[test]
fn status_uses_persisted_field_names() {
    let clock = FakeClock::new();
    let mut status = FlinkClusterStatus::default();
    status.reset_tasks(&[ClusterTask::StartingCluster], &clock);
    status.set_savepoint_request(Some(SavepointRequest::new("000", "XXX")), &clock);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["taskSequence"], serde_json::json!(["StartingCluster"]));
    assert_eq!(json["taskIndex"], 0);
    assert_eq!(json["taskStatus"], "Idle");
    assert_eq!(json["clusterStatus"], "Unknown");
    assert_eq!(json["savepointRequest"], serde_json::json!({ "jobId": "000", "triggerId": "XXX" }));
    assert!(json["operatorTimestamp"].as_u64().unwrap() > 0);
}

#[test]
fn empty_status_deserializes_to_defaults() {
    let status: FlinkClusterStatus = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(status, FlinkClusterStatus::default());
}

#[test]
fn resource_metadata() {
    assert_eq!(FlinkCluster::group(&()), "nextbreakpoint.com");
    assert_eq!(FlinkCluster::version(&()), "v1");
    assert_eq!(FlinkCluster::kind(&()), "FlinkCluster");
    assert_eq!(FlinkCluster::plural(&()), "flinkclusters");
}
