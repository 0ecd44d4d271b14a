// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One reconcile tick for one cluster.
//!
//! A tick loads the resource into the cache, turns new manual actions and
//! steady-state drift into plans, runs at most one task, and writes the
//! status block back once, conditional on the resource version it read.
//! If another writer got in between, the status block is re-applied onto a
//! fresh read and written once more: a triggered savepoint lives only in the
//! status block, so dropping the write would lose it.
//!
//! # Task status
//!
//! ```text
//! Executing ──SUCCESS──► next task (Executing), or Idle at the end of the plan
//!     │  ▲
//!     │  └──AWAIT/FAILED (attempts ≤ max)── Awaiting / Executing
//!     │
//!     └──ERROR, or attempts > max──► Failed ──next tick──► recovery plan
//! ```

mod actions;
mod tasks;

use crate::{plans, OperatorConfig, OperatorDeps};
use fop_adapters::{FlinkClient, KubeClient, KubeClientError};
use fop_core::{
    Clock, ClusterId, ClusterStatus, ClusterTask, FlinkCluster, FlinkClusterSpec,
    FlinkClusterStatus, ResultStatus, TaskStatus,
};
use thiserror::Error;
use tracing::Instrument;

/// Errors that abandon a tick. The next tick starts over from the API server.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Kube(#[from] KubeClientError),
    #[error("cluster {0} evicted from cache during tick")]
    NotCached(ClusterId),
}

impl ReconcileError {
    /// True when another writer updated the resource first
    pub fn is_conflict(&self) -> bool {
        matches!(self, ReconcileError::Kube(KubeClientError::Conflict(_)))
    }
}

/// Where a cluster stands after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub task: ClusterTask,
    pub task_status: TaskStatus,
    pub cluster_status: ClusterStatus,
    /// Result of the task run during this tick, if one ran
    pub result: Option<ResultStatus>,
    /// Whether the status block was written back
    pub written: bool,
}

pub struct Reconciler<K, F, C: Clock> {
    deps: OperatorDeps<K, F, C>,
    config: OperatorConfig,
}

impl<K, F, C> Reconciler<K, F, C>
where
    K: KubeClient,
    F: FlinkClient,
    C: Clock + 'static,
{
    pub fn new(deps: OperatorDeps<K, F, C>, config: OperatorConfig) -> Self {
        Self { deps, config }
    }

    pub fn deps(&self) -> &OperatorDeps<K, F, C> {
        &self.deps
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    pub async fn reconcile(&self, id: &ClusterId) -> Result<ReconcileOutcome, ReconcileError> {
        let span = tracing::info_span!("reconcile", cluster = %id);
        self.tick(id).instrument(span).await
    }

    async fn tick(&self, id: &ClusterId) -> Result<ReconcileOutcome, ReconcileError> {
        let start = std::time::Instant::now();
        let cluster = self.deps.kube.get_cluster(id).await?;
        let loaded = cluster.status.clone();
        self.deps.cache.insert(cluster);

        self.apply_manual_action(id).await?;
        self.plan(id).await?;
        let result = self.execute(id).await?;

        let cluster = self.deps.cache.get(id).ok_or_else(|| ReconcileError::NotCached(id.clone()))?;
        let written = cluster.status != loaded;
        if written {
            let updated = self.write_status(cluster).await?;
            self.deps.cache.insert(updated);
        }

        let outcome = self.with_status(id, |status, _| ReconcileOutcome {
            task: status.current_task(),
            task_status: status.task_status(),
            cluster_status: status.cluster_status(),
            result,
            written,
        })?;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            task = %outcome.task,
            task_status = %outcome.task_status,
            cluster_status = %outcome.cluster_status,
            written,
            elapsed_ms,
            "tick complete"
        );
        Ok(outcome)
    }

    /// Decide what the current task is before running it.
    async fn plan(&self, id: &ClusterId) -> Result<(), ReconcileError> {
        let clock = &self.deps.clock;
        let (has_task, cluster_status, task_status, is_last) = self.with_status(id, |s, _| {
            (s.has_current_task(), s.cluster_status(), s.task_status(), s.is_last_task())
        })?;

        if !has_task {
            if cluster_status == ClusterStatus::Unknown {
                tracing::info!("new cluster, starting");
                self.begin_plan(id, &plans::start())?;
            }
            return Ok(());
        }

        match task_status {
            TaskStatus::Executing | TaskStatus::Awaiting => Ok(()),
            TaskStatus::Idle if !is_last => self.with_status(id, |status, _| {
                status.select_next_task(clock);
                status.set_task_status(TaskStatus::Executing, clock);
                status.set_task_attempts(0, clock);
            }),
            TaskStatus::Idle => self.check_steady_state(id).await,
            TaskStatus::Failed => {
                let (failed, recovery) = self.with_status(id, |status, _| {
                    let failed = status.current_task();
                    let recovery = plans::recovery(status);
                    // A failed savepoint leaves the job running
                    if !matches!(failed, ClusterTask::CreatingSavepoint | ClusterTask::TriggerSavepoint) {
                        status.set_cluster_status(ClusterStatus::Failed, clock);
                    }
                    (failed, recovery)
                })?;
                tracing::warn!(task = %failed, "task failed, recovering");
                self.begin_plan(id, &recovery)
            }
        }
    }

    /// Run the current task once and record its result.
    async fn execute(&self, id: &ClusterId) -> Result<Option<ResultStatus>, ReconcileError> {
        let clock = &self.deps.clock;
        let max_attempts = self.config.max_task_attempts;
        let (task, task_status) =
            self.with_status(id, |status, _| (status.current_task(), status.task_status()))?;
        if !matches!(task_status, TaskStatus::Executing | TaskStatus::Awaiting) {
            return Ok(None);
        }

        let result = self.run_task(id, task).await?;
        tracing::info!(%task, %result, "task executed");

        self.with_status(id, |status, _| match result {
            ResultStatus::Success => {
                status.set_task_attempts(0, clock);
                if status.is_last_task() {
                    status.set_task_status(TaskStatus::Idle, clock);
                } else {
                    status.select_next_task(clock);
                    status.set_task_status(TaskStatus::Executing, clock);
                }
            }
            ResultStatus::Await | ResultStatus::Failed => {
                let attempts = status.task_attempts() + 1;
                status.set_task_attempts(attempts, clock);
                if attempts > max_attempts {
                    tracing::warn!(%task, attempts, "too many attempts");
                    status.set_task_status(TaskStatus::Failed, clock);
                } else if result == ResultStatus::Await {
                    status.set_task_status(TaskStatus::Awaiting, clock);
                }
            }
            ResultStatus::Error => {
                status.set_task_status(TaskStatus::Failed, clock);
            }
        })?;
        Ok(Some(result))
    }

    /// Conditional status write, retried once on a fresh read after a conflict.
    ///
    /// Only the operator writes the status block, so the fresh copy differs in
    /// spec, metadata, or annotations. A manual action annotated in between
    /// stays unprocessed, since the status keeps the older action timestamp.
    async fn write_status(&self, cluster: FlinkCluster) -> Result<FlinkCluster, ReconcileError> {
        match self.deps.kube.update_status(&cluster).await {
            Err(KubeClientError::Conflict(reason)) => {
                tracing::info!(%reason, "resource changed during tick, rewriting status");
                let mut fresh = self.deps.kube.get_cluster(&ClusterId::of(&cluster)).await?;
                fresh.status = cluster.status;
                Ok(self.deps.kube.update_status(&fresh).await?)
            }
            result => Ok(result?),
        }
    }

    /// Replace the plan and start its first task.
    fn begin_plan(&self, id: &ClusterId, plan: &[ClusterTask]) -> Result<(), ReconcileError> {
        let clock = &self.deps.clock;
        tracing::info!(?plan, "new plan");
        self.with_status(id, |status, _| {
            status.reset_tasks(plan, clock);
            status.set_task_status(TaskStatus::Executing, clock);
            status.set_task_attempts(0, clock);
        })
    }

    /// Start a plan that [`crate::CheckpointingPlan`] already installed.
    fn begin_installed_plan(&self, id: &ClusterId) -> Result<(), ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, _| {
            status.set_task_status(TaskStatus::Executing, clock);
            status.set_task_attempts(0, clock);
        })
    }

    /// Access the cached status block together with the spec.
    fn with_status<T>(
        &self,
        id: &ClusterId,
        f: impl FnOnce(&mut FlinkClusterStatus, &FlinkClusterSpec) -> T,
    ) -> Result<T, ReconcileError> {
        self.deps
            .cache
            .update(id, |cluster| {
                let status = cluster.status.get_or_insert_with(FlinkClusterStatus::default);
                f(status, &cluster.spec)
            })
            .ok_or_else(|| ReconcileError::NotCached(id.clone()))
    }
}

#[cfg(test)]
#[path = "../reconciler_tests/mod.rs"]
mod tests;
