// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciler tests

mod failures;
mod lifecycle;
mod manual_actions;
mod steady_state;

use super::*;
use crate::{ClusterCache, Command, ManualActionRequest, ManualActionUpdate, OperatorConfig, OperatorDeps};
use fop_adapters::{FakeFlinkClient, FakeKubeClient};
use fop_core::test_support::a_flink_cluster_with;
use fop_core::{FakeClock, FlinkCluster, FlinkClusterSpec, ManualAction};

const MAX_TICKS: usize = 20;

struct TestContext {
    kube: FakeKubeClient,
    flink: FakeFlinkClient,
    clock: FakeClock,
    reconciler: Reconciler<FakeKubeClient, FakeFlinkClient, FakeClock>,
    id: ClusterId,
}

fn setup() -> TestContext {
    setup_with(FlinkClusterSpec::builder().build(), OperatorConfig::default())
}

fn setup_with(spec: FlinkClusterSpec, config: OperatorConfig) -> TestContext {
    let kube = FakeKubeClient::new();
    kube.insert_cluster(a_flink_cluster_with("test", "flink", spec));
    let flink = FakeFlinkClient::new();
    flink.set_latest_savepoint(Some("file:/savepoints/savepoint-1"));
    let clock = FakeClock::new();
    let deps = OperatorDeps {
        kube: kube.clone(),
        flink: flink.clone(),
        clock: clock.clone(),
        cache: ClusterCache::new(),
    };
    TestContext {
        kube,
        flink,
        clock,
        reconciler: Reconciler::new(deps, config),
        id: ClusterId::new("flink", "test"),
    }
}

impl TestContext {
    async fn tick(&self) -> ReconcileOutcome {
        self.reconciler.reconcile(&self.id).await.unwrap()
    }

    /// Tick until the plan comes to rest on a resting task.
    async fn settle(&self) -> ReconcileOutcome {
        for _ in 0..MAX_TICKS {
            let outcome = self.tick().await;
            if outcome.task_status == TaskStatus::Idle && outcome.task.is_resting() {
                return outcome;
            }
        }
        panic!("cluster did not settle within {MAX_TICKS} ticks");
    }

    /// A started cluster running its bootstrap job
    async fn running(&self) -> ReconcileOutcome {
        let outcome = self.settle().await;
        assert_eq!(outcome.cluster_status, ClusterStatus::Running);
        outcome
    }

    fn stored(&self) -> FlinkCluster {
        self.kube.cluster(&self.id).unwrap()
    }

    fn status(&self) -> FlinkClusterStatus {
        self.stored().status.unwrap()
    }

    fn edit_spec(&self, f: impl FnOnce(&mut FlinkClusterSpec)) {
        self.kube.modify_cluster(&self.id, |cluster| f(&mut cluster.spec));
    }

    async fn request(&self, action: ManualAction) {
        let update = ManualActionUpdate::new(self.kube.clone(), self.clock.clone());
        let result = update.execute(&self.id, ManualActionRequest::new(action)).await;
        assert!(result.is_success());
    }
}
