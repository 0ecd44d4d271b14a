// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::crd::{FlinkCluster, FlinkClusterSpec};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for the task sequencer.
pub mod strategies {
    use crate::task::ClusterTask;
    use proptest::prelude::*;

    pub fn arb_cluster_task() -> impl Strategy<Value = ClusterTask> {
        prop_oneof![
            Just(ClusterTask::ClusterHalted),
            Just(ClusterTask::InitialiseCluster),
            Just(ClusterTask::StartingCluster),
            Just(ClusterTask::ClusterRunning),
            Just(ClusterTask::CreatingSavepoint),
            Just(ClusterTask::TriggerSavepoint),
            Just(ClusterTask::StoppingCluster),
            Just(ClusterTask::TerminatingCluster),
            Just(ClusterTask::RescalingCluster),
        ]
    }

    /// Sequencer operations that must never move the pointer backwards.
    #[derive(Debug, Clone)]
    pub enum SequencerOp {
        Append(Vec<ClusterTask>),
        SelectNext,
    }

    pub fn arb_sequencer_op() -> impl Strategy<Value = SequencerOp> {
        prop_oneof![
            proptest::collection::vec(arb_cluster_task(), 0..4).prop_map(SequencerOp::Append),
            Just(SequencerOp::SelectNext),
        ]
    }
}

// ── Resource factories ──────────────────────────────────────────────────

/// A `FlinkCluster` with a bootstrap job and no status block.
pub fn a_flink_cluster(name: &str, namespace: &str) -> FlinkCluster {
    a_flink_cluster_with(name, namespace, FlinkClusterSpec::builder().build())
}

pub fn a_flink_cluster_with(name: &str, namespace: &str, spec: FlinkClusterSpec) -> FlinkCluster {
    let mut cluster = FlinkCluster::new(name, spec);
    cluster.metadata.namespace = Some(namespace.to_string());
    cluster.metadata.resource_version = Some("1".to_string());
    cluster
}
