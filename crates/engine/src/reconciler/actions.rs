// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reasons to replace the plan: manual actions and steady-state drift.

use super::{ReconcileError, Reconciler};
use crate::command::{CheckpointingPlan, Command, SavepointForget};
use crate::plans;
use fop_adapters::{FlinkClient, KubeClient};
use fop_core::{
    Clock, ClusterId, ClusterStatus, ClusterTask, Digests, ManualAction, ManualActionAnnotation,
    ResultStatus, SavepointMode,
};

/// Drift of a running cluster from its spec
#[derive(Debug, PartialEq, Eq)]
enum Drift {
    None,
    Restart { changed: Vec<&'static str>, savepoint: bool },
    Rescale { savepoint: bool },
    Savepoint,
}

impl<K, F, C> Reconciler<K, F, C>
where
    K: KubeClient,
    F: FlinkClient,
    C: Clock + 'static,
{
    /// Turn an unprocessed manual action into a plan.
    ///
    /// The action's timestamp is recorded once the action is applied or
    /// rejected. An action that has to wait for the current plan stays
    /// unprocessed and is looked at again next tick.
    pub(super) async fn apply_manual_action(&self, id: &ClusterId) -> Result<(), ReconcileError> {
        let cluster =
            self.deps.cache.get(id).ok_or_else(|| ReconcileError::NotCached(id.clone()))?;
        let request = ManualActionAnnotation::of(&cluster);
        let status = cluster.status.clone().unwrap_or_default();
        if !request.is_newer_than(status.action_timestamp()) {
            return Ok(());
        }

        let cluster_status = status.cluster_status();
        let halting = status.task_sequence().last() == Some(&ClusterTask::ClusterHalted);
        let settled = !status.has_current_task() || status.current_task() == ClusterTask::ClusterHalted;
        let savepoint = cluster.spec.bootstrap.is_some()
            && !request.without_savepoint
            && !request.delete_resources
            && cluster_status == ClusterStatus::Running;

        tracing::info!(action = %request.action, %cluster_status, "manual action");
        let processed = match request.action {
            ManualAction::None => true,
            ManualAction::Start if cluster_status.is_halted() && settled => {
                self.begin_plan(id, &plans::start())?;
                true
            }
            // Wait for the cluster to come to rest
            ManualAction::Start if halting => false,
            ManualAction::Start => {
                tracing::info!("cluster not halted, start ignored");
                true
            }
            ManualAction::Stop | ManualAction::Suspend if halting => {
                tracing::info!("cluster already halting, stop ignored");
                true
            }
            ManualAction::Stop | ManualAction::Suspend => {
                self.begin_plan(id, &plans::stop(savepoint))?;
                true
            }
            ManualAction::Terminate
                if status.task_sequence().contains(&ClusterTask::TerminatingCluster) =>
            {
                tracing::info!("cluster already terminating, terminate ignored");
                true
            }
            ManualAction::Terminate => {
                self.begin_plan(id, &plans::terminate(savepoint))?;
                true
            }
            ManualAction::TriggerSavepoint if cluster_status.is_halted() => {
                tracing::info!("cluster not running, savepoint ignored");
                true
            }
            ManualAction::TriggerSavepoint => {
                let checkpoint = CheckpointingPlan::new(self.deps.cache.clone(), self.deps.clock.clone());
                match checkpoint.execute(id, ()).await.status {
                    ResultStatus::Success => {
                        self.begin_installed_plan(id)?;
                        true
                    }
                    ResultStatus::Await => false,
                    ResultStatus::Failed | ResultStatus::Error => true,
                }
            }
            ManualAction::ForgetSavepoint => {
                let forget = SavepointForget::new(self.deps.cache.clone(), self.deps.clock.clone());
                forget.execute(id, ()).await;
                true
            }
        };

        if processed {
            let clock = &self.deps.clock;
            self.with_status(id, |status, _| status.set_action_timestamp(request.timestamp, clock))?;
        }
        Ok(())
    }

    /// Look for drift once a plan has come to rest on a running cluster.
    pub(super) async fn check_steady_state(&self, id: &ClusterId) -> Result<(), ReconcileError> {
        let now = self.deps.clock.epoch_ms();
        let drift = self.with_status(id, |status, spec| {
            if status.current_task() != ClusterTask::ClusterRunning {
                return Drift::None;
            }
            let automatic = spec.bootstrap.is_some()
                && spec.operator.savepoint_mode == SavepointMode::Automatic
                && status.cluster_status() == ClusterStatus::Running;

            let changed = Digests::of(spec).changed_sections(status.digests());
            if !status.digests().is_empty() && !changed.is_empty() {
                return Drift::Restart { changed, savepoint: automatic };
            }
            if spec.task_managers != status.task_managers() {
                return Drift::Rescale { savepoint: automatic };
            }
            let due = spec.operator.savepoint_interval.filter(|secs| *secs > 0).is_some_and(|secs| {
                now >= status.savepoint_timestamp().saturating_add(secs.saturating_mul(1000))
            });
            if automatic && due {
                return Drift::Savepoint;
            }
            Drift::None
        })?;

        match drift {
            Drift::None => Ok(()),
            Drift::Restart { changed, savepoint } => {
                tracing::info!(?changed, savepoint, "spec changed, restarting");
                self.begin_plan(id, &plans::restart(savepoint))
            }
            Drift::Rescale { savepoint } => {
                tracing::info!(savepoint, "task managers changed, rescaling");
                self.begin_plan(id, &plans::rescale(savepoint))
            }
            Drift::Savepoint => {
                let checkpoint = CheckpointingPlan::new(self.deps.cache.clone(), self.deps.clock.clone());
                if checkpoint.execute(id, ()).await.is_success() {
                    tracing::info!("periodic savepoint");
                    self.begin_installed_plan(id)?;
                }
                Ok(())
            }
        }
    }
}
