// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Command;
use async_trait::async_trait;
use fop_adapters::KubeClient;
use fop_core::{ClusterId, OperationResult};

/// Delete the pods and services of a cluster
#[derive(Clone)]
pub struct ClusterTerminate<K> {
    kube: K,
}

impl<K: KubeClient> ClusterTerminate<K> {
    pub fn new(kube: K) -> Self {
        Self { kube }
    }
}

#[async_trait]
impl<K: KubeClient> Command<(), ()> for ClusterTerminate<K> {
    async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<()> {
        match self.kube.delete_cluster_resources(id).await {
            Ok(()) => {
                tracing::info!(cluster = %id, "cluster resources deleted");
                OperationResult::success(())
            }
            Err(e) => {
                tracing::warn!(cluster = %id, error = %e, "can't delete cluster resources");
                OperationResult::failed(())
            }
        }
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
