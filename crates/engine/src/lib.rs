// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fop-engine: commands, plans and the per-cluster reconciler

mod cache;
pub mod command;
mod config;
pub mod plans;
mod reconciler;

pub use cache::ClusterCache;
pub use command::{
    CheckpointingPlan, ClusterTerminate, Command, JobStart, JobStop, ManualActionRequest,
    ManualActionUpdate, RequestClusterStart, RequestClusterStop, RequestSavepointForget,
    RequestSavepointTrigger, SavepointForget, SavepointStatus, SavepointTrigger, StopOptions,
};
pub use config::OperatorConfig;
pub use reconciler::{Reconciler, ReconcileError, ReconcileOutcome};

use fop_core::Clock;

/// Collaborators shared by every command and the reconciler
#[derive(Clone)]
pub struct OperatorDeps<K, F, C: Clock> {
    pub kube: K,
    pub flink: F,
    pub clock: C,
    pub cache: ClusterCache,
}
