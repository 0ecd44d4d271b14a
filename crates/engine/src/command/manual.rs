// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that write manual-action requests for the reconciler to pick up.

use super::Command;
use async_trait::async_trait;
use fop_adapters::KubeClient;
use fop_core::annotations::{ACTION_TIMESTAMP, DELETE_RESOURCES, MANUAL_ACTION, WITHOUT_SAVEPOINT};
use fop_core::{Clock, ClusterId, FlinkCluster, ManualAction, OperationResult};
use kube::ResourceExt;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManualActionRequest {
    pub action: ManualAction,
    pub without_savepoint: bool,
    pub delete_resources: bool,
}

impl ManualActionRequest {
    pub fn new(action: ManualAction) -> Self {
        Self { action, ..Default::default() }
    }
}

/// Write a manual-action request onto the resource's annotations
#[derive(Clone)]
pub struct ManualActionUpdate<K, C: Clock> {
    kube: K,
    clock: C,
}

impl<K: KubeClient, C: Clock> ManualActionUpdate<K, C> {
    pub fn new(kube: K, clock: C) -> Self {
        Self { kube, clock }
    }
}

#[async_trait]
impl<K: KubeClient, C: Clock + 'static> Command<ManualActionRequest, ()> for ManualActionUpdate<K, C> {
    async fn execute(&self, id: &ClusterId, request: ManualActionRequest) -> OperationResult<()> {
        // Read live so the new timestamp orders after any request already written
        let mut cluster = match self.kube.get_cluster(id).await {
            Ok(cluster) => cluster,
            Err(e) => {
                tracing::warn!(cluster = %id, error = %e, "can't read cluster for manual action");
                return OperationResult::failed(());
            }
        };
        cluster.set_manual_action_request(
            request.action,
            request.without_savepoint,
            request.delete_resources,
            &self.clock,
        );
        let annotations = annotations_of(
            &cluster,
            &[MANUAL_ACTION, WITHOUT_SAVEPOINT, DELETE_RESOURCES, ACTION_TIMESTAMP],
        );

        match self.kube.update_annotations(id, &annotations).await {
            Ok(()) => {
                tracing::info!(cluster = %id, action = %request.action, "manual action requested");
                OperationResult::success(())
            }
            Err(e) => {
                tracing::warn!(
                    cluster = %id,
                    action = %request.action,
                    error = %e,
                    "can't write manual action"
                );
                OperationResult::failed(())
            }
        }
    }
}

/// The subset of annotations under `keys` that are set on `cluster`
fn annotations_of(cluster: &FlinkCluster, keys: &[&str]) -> BTreeMap<String, String> {
    cluster
        .annotations()
        .iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Options of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopOptions {
    /// Terminate and delete the cluster's resources instead of suspending
    pub delete_resources: bool,
    pub without_savepoint: bool,
}

/// Request a suspend, or a terminate when resources should be deleted
#[derive(Clone)]
pub struct RequestClusterStop<K, C: Clock> {
    update: ManualActionUpdate<K, C>,
}

impl<K: KubeClient, C: Clock> RequestClusterStop<K, C> {
    pub fn new(kube: K, clock: C) -> Self {
        Self { update: ManualActionUpdate::new(kube, clock) }
    }
}

#[async_trait]
impl<K: KubeClient, C: Clock + 'static> Command<StopOptions, ()> for RequestClusterStop<K, C> {
    async fn execute(&self, id: &ClusterId, options: StopOptions) -> OperationResult<()> {
        let action =
            if options.delete_resources { ManualAction::Terminate } else { ManualAction::Suspend };
        let request = ManualActionRequest {
            action,
            without_savepoint: options.without_savepoint,
            delete_resources: options.delete_resources,
        };
        self.update.execute(id, request).await
    }
}

macro_rules! fixed_action_command {
    ($(#[$meta:meta])* $name:ident => $action:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name<K, C: Clock> {
            update: ManualActionUpdate<K, C>,
        }

        impl<K: KubeClient, C: Clock> $name<K, C> {
            pub fn new(kube: K, clock: C) -> Self {
                Self { update: ManualActionUpdate::new(kube, clock) }
            }
        }

        #[async_trait]
        impl<K: KubeClient, C: Clock + 'static> Command<(), ()> for $name<K, C> {
            async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<()> {
                self.update.execute(id, ManualActionRequest::new($action)).await
            }
        }
    };
}

fixed_action_command! {
    /// Request a start of a halted cluster
    RequestClusterStart => ManualAction::Start
}

fixed_action_command! {
    /// Request an out-of-schedule savepoint
    RequestSavepointTrigger => ManualAction::TriggerSavepoint
}

fixed_action_command! {
    /// Request that the stored savepoint path be dropped
    RequestSavepointForget => ManualAction::ForgetSavepoint
}

#[cfg(test)]
#[path = "manual_tests.rs"]
mod tests;
