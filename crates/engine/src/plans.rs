// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task plans for each lifecycle transition.
//!
//! A plan is built once per transition and drained one task at a time by
//! the reconciler. Plans that stop a running job optionally begin with a
//! savepoint so the job can resume from it.

use fop_core::{ClusterTask, FlinkClusterStatus};
use ClusterTask::*;

const SAVEPOINT: [ClusterTask; 2] = [CreatingSavepoint, TriggerSavepoint];

fn with_savepoint(savepoint: bool, tasks: &[ClusterTask]) -> Vec<ClusterTask> {
    let prefix: &[ClusterTask] = if savepoint { &SAVEPOINT } else { &[] };
    prefix.iter().chain(tasks).copied().collect()
}

pub fn start() -> Vec<ClusterTask> {
    vec![InitialiseCluster, StartingCluster, ClusterRunning]
}

/// Savepoint cycle of a running cluster
pub fn checkpoint() -> Vec<ClusterTask> {
    with_savepoint(true, &[ClusterRunning])
}

/// Stop and suspend share a plan; they differ in the halted status.
pub fn stop(savepoint: bool) -> Vec<ClusterTask> {
    with_savepoint(savepoint, &[StoppingCluster, ClusterHalted])
}

pub fn terminate(savepoint: bool) -> Vec<ClusterTask> {
    with_savepoint(savepoint, &[StoppingCluster, TerminatingCluster, ClusterHalted])
}

pub fn restart(savepoint: bool) -> Vec<ClusterTask> {
    with_savepoint(savepoint, &[StoppingCluster, StartingCluster, ClusterRunning])
}

pub fn rescale(savepoint: bool) -> Vec<ClusterTask> {
    with_savepoint(savepoint, &[StoppingCluster, RescalingCluster, StartingCluster, ClusterRunning])
}

/// Plan that replaces a plan whose current task failed.
///
/// A failed savepoint is skipped and the rest of the plan carries on. Any
/// other failure halts the cluster.
pub fn recovery(status: &FlinkClusterStatus) -> Vec<ClusterTask> {
    match status.current_task() {
        CreatingSavepoint | TriggerSavepoint => {
            let rest: Vec<_> = status
                .task_sequence()
                .iter()
                .skip(status.task_index() + 1)
                .filter(|task| !SAVEPOINT.contains(task))
                .copied()
                .collect();
            if rest.is_empty() {
                vec![ClusterRunning]
            } else {
                rest
            }
        }
        InitialiseCluster | StartingCluster | RescalingCluster | ClusterRunning => {
            vec![StoppingCluster, ClusterHalted]
        }
        StoppingCluster | TerminatingCluster | ClusterHalted => vec![ClusterHalted],
    }
}

#[cfg(test)]
#[path = "plans_tests.rs"]
mod tests;
