// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::test_support::a_flink_cluster;
use std::time::Duration;

#[test]
fn unannotated_cluster_reads_defaults() {
    let cluster = a_flink_cluster("test", "flink");
    assert_eq!(ManualActionAnnotation::of(&cluster), ManualActionAnnotation::default());
}

#[test]
fn cluster_stores_manual_action() {
    let clock = FakeClock::new();
    let mut cluster = a_flink_cluster("test", "flink");

    let timestamp1 = clock.epoch_ms();
    cluster.set_manual_action(ManualAction::Start, &clock);
    assert_eq!(cluster.manual_action(), ManualAction::Start);
    assert!(cluster.action_timestamp() >= timestamp1);

    clock.advance(Duration::from_secs(1));
    let timestamp2 = clock.epoch_ms();
    cluster.set_manual_action(ManualAction::Stop, &clock);
    assert_eq!(cluster.manual_action(), ManualAction::Stop);
    assert!(cluster.action_timestamp() >= timestamp2);
}

#[test]
fn cluster_stores_delete_resources() {
    let clock = FakeClock::new();
    let mut cluster = a_flink_cluster("test", "flink");

    cluster.set_delete_resources(true, &clock);
    assert!(cluster.is_delete_resources());
    let first = cluster.action_timestamp();

    cluster.set_delete_resources(false, &clock);
    assert!(!cluster.is_delete_resources());
    assert!(cluster.action_timestamp() > first);
}

#[test]
fn cluster_stores_without_savepoint() {
    let clock = FakeClock::new();
    let mut cluster = a_flink_cluster("test", "flink");

    cluster.set_without_savepoint(true, &clock);
    assert!(cluster.is_without_savepoint());
    let first = cluster.action_timestamp();

    cluster.set_without_savepoint(false, &clock);
    assert!(!cluster.is_without_savepoint());
    assert!(cluster.action_timestamp() > first);
}

#[test]
fn request_writes_all_annotations() {
    let clock = FakeClock::new();
    let mut cluster = a_flink_cluster("test", "flink");
    cluster.set_manual_action_request(ManualAction::Suspend, true, false, &clock);

    let annotations = cluster.annotations();
    assert_eq!(annotations.get(MANUAL_ACTION).map(String::as_str), Some("SUSPEND"));
    assert_eq!(annotations.get(WITHOUT_SAVEPOINT).map(String::as_str), Some("true"));
    assert_eq!(annotations.get(DELETE_RESOURCES).map(String::as_str), Some("false"));
    assert_eq!(
        annotations.get(ACTION_TIMESTAMP).map(String::as_str),
        Some(clock.epoch_ms().to_string().as_str())
    );
}

#[test]
fn unknown_action_reads_as_none() {
    let mut cluster = a_flink_cluster("test", "flink");
    cluster.annotations_mut().insert(MANUAL_ACTION.to_string(), "REBOOT".to_string());
    assert_eq!(cluster.manual_action(), ManualAction::None);
}

#[test]
fn malformed_timestamp_reads_as_zero() {
    let mut cluster = a_flink_cluster("test", "flink");
    cluster.annotations_mut().insert(ACTION_TIMESTAMP.to_string(), "yesterday".to_string());
    assert_eq!(cluster.action_timestamp(), 0);
}

#[test]
fn newer_than_compares_timestamps() {
    let annotation = ManualActionAnnotation { timestamp: 10, ..Default::default() };
    assert!(annotation.is_newer_than(9));
    assert!(!annotation.is_newer_than(10));
    assert!(!annotation.is_newer_than(11));
}

#[yare::parameterized(
    none      = { "NONE",              ManualAction::None },
    empty     = { "",                  ManualAction::None },
    start     = { "START",             ManualAction::Start },
    stop      = { "STOP",              ManualAction::Stop },
    suspend   = { "SUSPEND",           ManualAction::Suspend },
    terminate = { "TERMINATE",         ManualAction::Terminate },
    trigger   = { "TRIGGER_SAVEPOINT", ManualAction::TriggerSavepoint },
    forget    = { "FORGET_SAVEPOINT",  ManualAction::ForgetSavepoint },
)]
fn parses_action_names(name: &str, expected: ManualAction) {
    assert_eq!(name.parse::<ManualAction>(), Ok(expected));
    if !name.is_empty() {
        assert_eq!(expected.to_string(), name);
    }
}

#[test]
fn rejects_unknown_action() {
    assert_eq!(
        "restart".parse::<ManualAction>(),
        Err(UnknownManualAction("restart".to_string()))
    );
}
