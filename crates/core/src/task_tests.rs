// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use proptest::prelude::*;

#[test]
fn default_task_is_cluster_halted() {
    assert_eq!(ClusterTask::default(), ClusterTask::ClusterHalted);
}

#[yare::parameterized(
    halted       = { ClusterTask::ClusterHalted,      true },
    running      = { ClusterTask::ClusterRunning,     true },
    initialise   = { ClusterTask::InitialiseCluster,  false },
    starting     = { ClusterTask::StartingCluster,    false },
    savepoint    = { ClusterTask::CreatingSavepoint,  false },
    trigger      = { ClusterTask::TriggerSavepoint,   false },
    stopping     = { ClusterTask::StoppingCluster,    false },
    terminating  = { ClusterTask::TerminatingCluster, false },
    rescaling    = { ClusterTask::RescalingCluster,   false },
)]
fn resting_tasks(task: ClusterTask, resting: bool) {
    assert_eq!(task.is_resting(), resting);
}

#[yare::parameterized(
    unknown       = { ClusterStatus::Unknown,       true },
    starting      = { ClusterStatus::Starting,      false },
    running       = { ClusterStatus::Running,       false },
    checkpointing = { ClusterStatus::Checkpointing, false },
    stopping      = { ClusterStatus::Stopping,      false },
    stopped       = { ClusterStatus::Stopped,       true },
    suspended     = { ClusterStatus::Suspended,     true },
    terminated    = { ClusterStatus::Terminated,    true },
    failed        = { ClusterStatus::Failed,        true },
)]
fn halted_cluster_statuses(status: ClusterStatus, halted: bool) {
    assert_eq!(status.is_halted(), halted);
}

#[test]
fn task_serializes_as_variant_name() {
    let json = serde_json::to_string(&ClusterTask::CreatingSavepoint).unwrap();
    assert_eq!(json, "\"CreatingSavepoint\"");
}

proptest! {
    #[test]
    fn task_display_matches_serde_name(task in arb_cluster_task()) {
        let json = serde_json::to_string(&task).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", task));
    }
}
