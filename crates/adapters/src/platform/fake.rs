// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory API server for tests.

use super::{KubeClient, KubeClientError};
use crate::flink::FlinkAddress;
use async_trait::async_trait;
use fop_core::{ClusterId, FlinkCluster, FlinkClusterStatus};
use kube::ResourceExt;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Operation selector for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KubeOp {
    ResolveClusterAddress,
    GetCluster,
    ListClusters,
    UpdateAnnotations,
    UpdateStatus,
    DeleteClusterResources,
}

/// Recorded Kubernetes call
#[derive(Debug, Clone, PartialEq)]
pub enum KubeCall {
    ResolveClusterAddress { id: ClusterId },
    GetCluster { id: ClusterId },
    ListClusters { namespace: Option<String> },
    UpdateAnnotations { id: ClusterId, annotations: BTreeMap<String, String> },
    UpdateStatus { id: ClusterId, status: Option<FlinkClusterStatus> },
    DeleteClusterResources { id: ClusterId },
}

impl KubeCall {
    pub fn op(&self) -> KubeOp {
        match self {
            KubeCall::ResolveClusterAddress { .. } => KubeOp::ResolveClusterAddress,
            KubeCall::GetCluster { .. } => KubeOp::GetCluster,
            KubeCall::ListClusters { .. } => KubeOp::ListClusters,
            KubeCall::UpdateAnnotations { .. } => KubeOp::UpdateAnnotations,
            KubeCall::UpdateStatus { .. } => KubeOp::UpdateStatus,
            KubeCall::DeleteClusterResources { .. } => KubeOp::DeleteClusterResources,
        }
    }
}

type Interleaved = (ClusterId, Box<dyn FnOnce(&mut FlinkCluster) + Send>);

#[derive(Default)]
struct FakeKubeState {
    clusters: BTreeMap<ClusterId, FlinkCluster>,
    addresses: HashMap<ClusterId, FlinkAddress>,
    failures: HashMap<KubeOp, KubeClientError>,
    interleaved: HashMap<KubeOp, Interleaved>,
    calls: Vec<KubeCall>,
    resource_version: u64,
}

impl FakeKubeState {
    /// Apply a pending interleaved write for `op`, then any injected failure
    fn check(&mut self, op: KubeOp) -> Result<(), KubeClientError> {
        if let Some((id, f)) = self.interleaved.remove(&op) {
            if let Some(mut cluster) = self.clusters.remove(&id) {
                f(&mut cluster);
                self.bump(&mut cluster);
                self.clusters.insert(id, cluster);
            }
        }
        match self.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn bump(&mut self, cluster: &mut FlinkCluster) {
        self.resource_version += 1;
        cluster.metadata.resource_version = Some(self.resource_version.to_string());
    }
}

/// Fake Kubernetes client for testing.
///
/// Every write bumps the stored resource version, and status updates carrying
/// a stale version fail with [`KubeClientError::Conflict`], like the real API
/// server.
#[derive(Clone, Default)]
pub struct FakeKubeClient {
    inner: Arc<Mutex<FakeKubeState>>,
}

impl FakeKubeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cluster as if a user had created it
    pub fn insert_cluster(&self, mut cluster: FlinkCluster) {
        let mut state = self.inner.lock();
        state.bump(&mut cluster);
        state.clusters.insert(ClusterId::of(&cluster), cluster);
    }

    pub fn cluster(&self, id: &ClusterId) -> Option<FlinkCluster> {
        self.inner.lock().clusters.get(id).cloned()
    }

    pub fn remove_cluster(&self, id: &ClusterId) {
        self.inner.lock().clusters.remove(id);
    }

    /// Apply a change to a stored cluster as another writer would
    pub fn modify_cluster(&self, id: &ClusterId, f: impl FnOnce(&mut FlinkCluster)) {
        let mut state = self.inner.lock();
        if let Some(mut cluster) = state.clusters.remove(id) {
            f(&mut cluster);
            state.bump(&mut cluster);
            state.clusters.insert(id.clone(), cluster);
        }
    }

    /// Apply a change as another writer would, just before the next call of
    /// `op` is served. Lets tests land a write between a read and a write.
    pub fn interleave(
        &self,
        op: KubeOp,
        id: &ClusterId,
        f: impl FnOnce(&mut FlinkCluster) + Send + 'static,
    ) {
        self.inner.lock().interleaved.insert(op, (id.clone(), Box::new(f)));
    }

    pub fn set_address(&self, id: &ClusterId, address: FlinkAddress) {
        self.inner.lock().addresses.insert(id.clone(), address);
    }

    /// Make every call of `op` fail until cleared
    pub fn fail(&self, op: KubeOp, err: KubeClientError) {
        self.inner.lock().failures.insert(op, err);
    }

    pub fn clear_failure(&self, op: KubeOp) {
        self.inner.lock().failures.remove(&op);
    }

    pub fn calls(&self) -> Vec<KubeCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, op: KubeOp) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.op() == op).count()
    }
}

#[async_trait]
impl KubeClient for FakeKubeClient {
    async fn resolve_cluster_address(
        &self,
        id: &ClusterId,
    ) -> Result<FlinkAddress, KubeClientError> {
        let mut state = self.inner.lock();
        state.calls.push(KubeCall::ResolveClusterAddress { id: id.clone() });
        state.check(KubeOp::ResolveClusterAddress)?;
        if let Some(address) = state.addresses.get(id) {
            return Ok(address.clone());
        }
        if state.clusters.contains_key(id) {
            return Ok(FlinkAddress::new(format!("flink-jobmanager-{}", id.name), 8081));
        }
        Err(KubeClientError::AddressNotFound(id.to_string()))
    }

    async fn get_cluster(&self, id: &ClusterId) -> Result<FlinkCluster, KubeClientError> {
        let mut state = self.inner.lock();
        state.calls.push(KubeCall::GetCluster { id: id.clone() });
        state.check(KubeOp::GetCluster)?;
        state.clusters.get(id).cloned().ok_or_else(|| KubeClientError::NotFound(id.to_string()))
    }

    async fn list_clusters(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<FlinkCluster>, KubeClientError> {
        let mut state = self.inner.lock();
        state.calls.push(KubeCall::ListClusters { namespace: namespace.map(str::to_string) });
        state.check(KubeOp::ListClusters)?;
        Ok(state
            .clusters
            .iter()
            .filter(|(id, _)| namespace.map_or(true, |ns| id.namespace == ns))
            .map(|(_, cluster)| cluster.clone())
            .collect())
    }

    async fn update_annotations(
        &self,
        id: &ClusterId,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), KubeClientError> {
        let mut state = self.inner.lock();
        state
            .calls
            .push(KubeCall::UpdateAnnotations { id: id.clone(), annotations: annotations.clone() });
        state.check(KubeOp::UpdateAnnotations)?;
        let mut cluster =
            state.clusters.remove(id).ok_or_else(|| KubeClientError::NotFound(id.to_string()))?;
        cluster.annotations_mut().extend(annotations.clone());
        state.bump(&mut cluster);
        state.clusters.insert(id.clone(), cluster);
        Ok(())
    }

    async fn update_status(&self, cluster: &FlinkCluster) -> Result<FlinkCluster, KubeClientError> {
        let id = ClusterId::of(cluster);
        let mut state = self.inner.lock();
        state.calls.push(KubeCall::UpdateStatus { id: id.clone(), status: cluster.status.clone() });
        state.check(KubeOp::UpdateStatus)?;
        let stored =
            state.clusters.get(&id).ok_or_else(|| KubeClientError::NotFound(id.to_string()))?;
        if stored.metadata.resource_version != cluster.metadata.resource_version {
            return Err(KubeClientError::Conflict(format!(
                "{}: resource version {:?} is stale",
                id, cluster.metadata.resource_version
            )));
        }
        let mut updated = stored.clone();
        updated.status = cluster.status.clone();
        state.bump(&mut updated);
        state.clusters.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_cluster_resources(&self, id: &ClusterId) -> Result<(), KubeClientError> {
        let mut state = self.inner.lock();
        state.calls.push(KubeCall::DeleteClusterResources { id: id.clone() });
        state.check(KubeOp::DeleteClusterResources)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
