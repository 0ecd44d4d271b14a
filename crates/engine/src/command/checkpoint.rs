// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Command;
use crate::cache::ClusterCache;
use crate::plans;
use async_trait::async_trait;
use fop_core::{Clock, ClusterId, ClusterStatus, ClusterTask, OperationResult, TaskStatus};

/// Replace the plan of a running cluster with a savepoint cycle.
///
/// Waits while a task is in flight or the cluster is not running, leaving
/// the plan untouched. Clusters without a job have nothing to savepoint.
#[derive(Clone)]
pub struct CheckpointingPlan<C: Clock> {
    cache: ClusterCache,
    clock: C,
}

impl<C: Clock> CheckpointingPlan<C> {
    pub fn new(cache: ClusterCache, clock: C) -> Self {
        Self { cache, clock }
    }
}

#[async_trait]
impl<C: Clock + 'static> Command<(), Vec<ClusterTask>> for CheckpointingPlan<C> {
    async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<Vec<ClusterTask>> {
        let result = self.cache.update(id, |cluster| {
            let has_job = cluster.spec.bootstrap.is_some();
            let status = cluster.status_mut();
            let current = status.current_task();

            if status.task_status() != TaskStatus::Idle
                || status.cluster_status() != ClusterStatus::Running
            {
                tracing::debug!(
                    cluster = %id,
                    task_status = %status.task_status(),
                    cluster_status = %status.cluster_status(),
                    "savepoint deferred"
                );
                return OperationResult::awaiting(vec![current]);
            }
            if !has_job {
                tracing::warn!(cluster = %id, "no job defined, savepoint not possible");
                return OperationResult::failed(vec![current]);
            }

            let plan = plans::checkpoint();
            status.reset_tasks(&plan, &self.clock);
            OperationResult::success(plan)
        });

        result.unwrap_or_else(|| {
            tracing::warn!(cluster = %id, "cluster not cached");
            OperationResult::failed(vec![])
        })
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
