// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation commands.
//!
//! A command performs one set of side effects against the Flink REST API
//! and/or the API server and reports how the caller should proceed. Commands
//! never loop and never return `Err`: collaborator failures are logged and
//! folded into the [`OperationResult`] status.
//!
//! | Command | Output | Effect |
//! |---------|--------|--------|
//! | [`ManualActionUpdate`] | `()` | writes the manual-action annotations |
//! | [`CheckpointingPlan`] | `Vec<ClusterTask>` | resets the plan to a savepoint cycle |
//! | [`SavepointTrigger`] | `Option<SavepointRequest>` | triggers a savepoint of the single running job |
//! | [`SavepointStatus`] | `Option<String>` | polls a savepoint, yields its path |
//! | [`SavepointForget`] | `()` | clears the stored savepoint path |
//! | [`JobStart`] | `()` | submits the bootstrap job |
//! | [`JobStop`] | `()` | cancels running jobs |
//! | [`ClusterTerminate`] | `()` | deletes the cluster's resources |

mod checkpoint;
mod cluster;
mod job;
mod manual;
mod savepoint;

pub use checkpoint::CheckpointingPlan;
pub use cluster::ClusterTerminate;
pub use job::{JobStart, JobStop};
pub use manual::{
    ManualActionRequest, ManualActionUpdate, RequestClusterStart, RequestClusterStop,
    RequestSavepointForget, RequestSavepointTrigger, StopOptions,
};
pub use savepoint::{SavepointForget, SavepointStatus, SavepointTrigger};

use async_trait::async_trait;
use fop_adapters::{FlinkAddress, KubeClient, KubeClientError};
use fop_core::{ClusterId, OperationResult};

/// One reconciliation action against one cluster
#[async_trait]
pub trait Command<P: Send + 'static, R: Send>: Send + Sync {
    async fn execute(&self, id: &ClusterId, params: P) -> OperationResult<R>;
}

/// Resolve the job manager address, logging failures with cluster context.
async fn resolve_address<K: KubeClient>(
    kube: &K,
    id: &ClusterId,
) -> Result<FlinkAddress, KubeClientError> {
    kube.resolve_cluster_address(id).await.inspect_err(|e| {
        tracing::warn!(cluster = %id, error = %e, "can't resolve job manager address");
    })
}
