// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_core::FakeClock;

#[test]
fn start_initialises_then_runs() {
    assert_eq!(start(), vec![InitialiseCluster, StartingCluster, ClusterRunning]);
}

#[test]
fn checkpoint_returns_to_running() {
    assert_eq!(checkpoint(), vec![CreatingSavepoint, TriggerSavepoint, ClusterRunning]);
}

#[yare::parameterized(
    stop_with      = { stop(true),      vec![CreatingSavepoint, TriggerSavepoint, StoppingCluster, ClusterHalted] },
    stop_without   = { stop(false),     vec![StoppingCluster, ClusterHalted] },
    terminate_with = { terminate(true), vec![CreatingSavepoint, TriggerSavepoint, StoppingCluster, TerminatingCluster, ClusterHalted] },
    terminate_without = { terminate(false), vec![StoppingCluster, TerminatingCluster, ClusterHalted] },
    restart_with   = { restart(true),   vec![CreatingSavepoint, TriggerSavepoint, StoppingCluster, StartingCluster, ClusterRunning] },
    restart_without = { restart(false), vec![StoppingCluster, StartingCluster, ClusterRunning] },
    rescale_without = { rescale(false), vec![StoppingCluster, RescalingCluster, StartingCluster, ClusterRunning] },
)]
fn plans_prefix_savepoint_on_request(plan: Vec<ClusterTask>, expected: Vec<ClusterTask>) {
    assert_eq!(plan, expected);
}

fn status_at(plan: &[ClusterTask], index: usize) -> FlinkClusterStatus {
    let clock = FakeClock::new();
    let mut status = FlinkClusterStatus::default();
    status.reset_tasks(plan, &clock);
    for _ in 0..index {
        status.select_next_task(&clock);
    }
    status
}

#[test]
fn failed_savepoint_in_stop_plan_continues_stopping() {
    let status = status_at(&stop(true), 1);
    assert_eq!(recovery(&status), vec![StoppingCluster, ClusterHalted]);
}

#[test]
fn failed_savepoint_in_checkpoint_cycle_resumes_running() {
    let status = status_at(&checkpoint(), 0);
    assert_eq!(recovery(&status), vec![ClusterRunning]);
}

#[test]
fn failed_savepoint_without_remaining_plan_resumes_running() {
    let status = status_at(&[TriggerSavepoint], 0);
    assert_eq!(recovery(&status), vec![ClusterRunning]);
}

#[yare::parameterized(
    initialise = { InitialiseCluster },
    starting   = { StartingCluster },
    rescaling  = { RescalingCluster },
)]
fn failed_start_halts_cluster(task: ClusterTask) {
    let status = status_at(&[task], 0);
    assert_eq!(recovery(&status), vec![StoppingCluster, ClusterHalted]);
}

#[yare::parameterized(
    stopping    = { StoppingCluster },
    terminating = { TerminatingCluster },
)]
fn failed_stop_goes_straight_to_halted(task: ClusterTask) {
    let status = status_at(&[task], 0);
    assert_eq!(recovery(&status), vec![ClusterHalted]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_plan() -> impl Strategy<Value = Vec<ClusterTask>> {
        any::<bool>().prop_flat_map(|savepoint| {
            prop_oneof![
                Just(start()),
                Just(checkpoint()),
                Just(stop(savepoint)),
                Just(terminate(savepoint)),
                Just(restart(savepoint)),
                Just(rescale(savepoint)),
            ]
        })
    }

    proptest! {
        #[test]
        fn recovery_ends_at_rest_without_savepoints(plan in arb_plan(), index in 0usize..6) {
            let status = status_at(&plan, index);
            let recovery = recovery(&status);

            prop_assert!(recovery.last().is_some_and(ClusterTask::is_resting));
            prop_assert!(!recovery.contains(&CreatingSavepoint));
            prop_assert!(!recovery.contains(&TriggerSavepoint));
        }

        #[test]
        fn savepoint_flag_only_adds_prefix(savepoint in any::<bool>()) {
            for (with, without) in [
                (stop(savepoint), stop(false)),
                (terminate(savepoint), terminate(false)),
                (restart(savepoint), restart(false)),
                (rescale(savepoint), rescale(false)),
            ] {
                prop_assert!(with.ends_with(&without));
                prop_assert_eq!(with.len() - without.len(), if savepoint { 2 } else { 0 });
            }
        }
    }
}
