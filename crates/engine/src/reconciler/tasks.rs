// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handlers for each [`ClusterTask`].

use super::{ReconcileError, Reconciler};
use crate::command::{ClusterTerminate, Command, JobStart, JobStop, SavepointStatus, SavepointTrigger};
use fop_adapters::{FlinkClient, KubeClient};
use fop_core::{
    Clock, ClusterId, ClusterStatus, ClusterTask, Digests, FlinkClusterStatus, ManualAction,
    ResultStatus, SavepointOptions,
};

impl<K, F, C> Reconciler<K, F, C>
where
    K: KubeClient,
    F: FlinkClient,
    C: Clock + 'static,
{
    pub(super) async fn run_task(
        &self,
        id: &ClusterId,
        task: ClusterTask,
    ) -> Result<ResultStatus, ReconcileError> {
        match task {
            ClusterTask::InitialiseCluster => self.initialise(id),
            ClusterTask::StartingCluster => self.starting(id).await,
            ClusterTask::ClusterRunning => self.running(id),
            ClusterTask::CreatingSavepoint => self.creating_savepoint(id),
            ClusterTask::TriggerSavepoint => self.trigger_savepoint(id).await,
            ClusterTask::StoppingCluster => self.stopping(id).await,
            ClusterTask::TerminatingCluster => {
                let terminate = ClusterTerminate::new(self.deps.kube.clone());
                Ok(terminate.execute(id, ()).await.status)
            }
            ClusterTask::RescalingCluster => self.rescaling(id),
            ClusterTask::ClusterHalted => self.halted(id),
        }
    }

    /// Record the applied spec so later drift is measured against it.
    fn initialise(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, spec| {
            set_cluster_status(status, ClusterStatus::Starting, clock);
            status.set_digests(Digests::of(spec), clock);
            status.set_scale(spec.task_managers, spec.task_manager.task_slots, clock);
            // Periodic savepoints count from the start of the cluster
            status.update_savepoint_timestamp(clock);
            ResultStatus::Success
        })
    }

    async fn starting(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        let has_job = self.with_status(id, |status, spec| {
            set_cluster_status(status, ClusterStatus::Starting, clock);
            spec.bootstrap.is_some()
        })?;

        let result = if has_job {
            let start = JobStart::new(
                self.deps.kube.clone(),
                self.deps.flink.clone(),
                self.deps.cache.clone(),
            );
            start.execute(id, ()).await.status
        } else {
            ResultStatus::Success
        };

        if result == ResultStatus::Success {
            self.with_status(id, |status, spec| {
                let digests = Digests::of(spec);
                if status.digests() != &digests {
                    status.set_digests(digests, clock);
                }
                if (status.task_managers(), status.task_slots())
                    != (spec.task_managers, spec.task_manager.task_slots)
                {
                    status.set_scale(spec.task_managers, spec.task_manager.task_slots, clock);
                }
            })?;
        }
        Ok(result)
    }

    fn running(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, _| {
            set_cluster_status(status, ClusterStatus::Running, clock);
            ResultStatus::Success
        })
    }

    fn creating_savepoint(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, _| {
            if status.cluster_status() == ClusterStatus::Running {
                set_cluster_status(status, ClusterStatus::Checkpointing, clock);
            }
            status.update_savepoint_timestamp(clock);
            ResultStatus::Success
        })
    }

    /// Trigger on the first run, then poll the stored request until the
    /// savepoint completes.
    async fn trigger_savepoint(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        let (request, target_path) = self.with_status(id, |status, spec| {
            (status.savepoint_request().cloned(), spec.operator.savepoint_target_path.clone())
        })?;

        let Some(request) = request else {
            let trigger = SavepointTrigger::new(self.deps.kube.clone(), self.deps.flink.clone());
            let result = trigger.execute(id, SavepointOptions { target_path }).await;
            return match (result.status, result.output) {
                (ResultStatus::Success, Some(request)) => {
                    tracing::info!(job_id = %request.job_id, "savepoint triggered");
                    self.with_status(id, |status, _| {
                        status.set_savepoint_request(Some(request), clock);
                    })?;
                    Ok(ResultStatus::Await)
                }
                (ResultStatus::Success, None) => Ok(ResultStatus::Failed),
                (status, _) => Ok(status),
            };
        };

        let poll = SavepointStatus::new(self.deps.kube.clone(), self.deps.flink.clone());
        let result = poll.execute(id, request).await;
        match (result.status, result.output) {
            (ResultStatus::Success, Some(path)) => {
                tracing::info!(path = %path, "savepoint completed");
                self.with_status(id, |status, _| {
                    status.set_savepoint_path(Some(path), clock);
                    status.set_savepoint_request(None, clock);
                })?;
                Ok(ResultStatus::Success)
            }
            (ResultStatus::Await, _) => Ok(ResultStatus::Await),
            (status, _) => {
                // Trigger again on the next attempt
                self.with_status(id, |s, _| s.set_savepoint_request(None, clock))?;
                Ok(if status == ResultStatus::Success { ResultStatus::Failed } else { status })
            }
        }
    }

    async fn stopping(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, _| {
            if status.cluster_status() != ClusterStatus::Failed {
                set_cluster_status(status, ClusterStatus::Stopping, clock);
            }
        })?;
        let stop = JobStop::new(self.deps.kube.clone(), self.deps.flink.clone());
        Ok(stop.execute(id, ()).await.status)
    }

    fn rescaling(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        self.with_status(id, |status, spec| {
            tracing::info!(
                task_managers = spec.task_managers,
                task_slots = spec.task_manager.task_slots,
                "rescaling"
            );
            status.set_scale(spec.task_managers, spec.task_manager.task_slots, clock);
            ResultStatus::Success
        })
    }

    /// Settle on the halted status the last manual action asked for.
    fn halted(&self, id: &ClusterId) -> Result<ResultStatus, ReconcileError> {
        let clock = &self.deps.clock;
        let action = self
            .deps
            .cache
            .get(id)
            .map(|cluster| cluster.manual_action())
            .ok_or_else(|| ReconcileError::NotCached(id.clone()))?;
        self.with_status(id, |status, _| {
            if status.cluster_status() != ClusterStatus::Failed {
                let halted = match action {
                    ManualAction::Suspend => ClusterStatus::Suspended,
                    ManualAction::Terminate => ClusterStatus::Terminated,
                    _ => ClusterStatus::Stopped,
                };
                set_cluster_status(status, halted, clock);
            }
            ResultStatus::Success
        })
    }
}

/// Set the cluster status only when it changes, so a no-op does not
/// advance the operator timestamp and force a write.
fn set_cluster_status(status: &mut FlinkClusterStatus, value: ClusterStatus, clock: &impl Clock) {
    if status.cluster_status() != value {
        status.set_cluster_status(value, clock);
    }
}
