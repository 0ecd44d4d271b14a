// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Latest known `FlinkCluster` per cluster.
//!
//! The reconciler loads the resource once per tick and commands read and
//! mutate that snapshot here instead of calling the API server again.

use fop_core::{ClusterId, FlinkCluster};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ClusterCache {
    inner: Arc<Mutex<HashMap<ClusterId, FlinkCluster>>>,
}

impl ClusterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, replacing any previous one for the same cluster
    pub fn insert(&self, cluster: FlinkCluster) -> ClusterId {
        let id = ClusterId::of(&cluster);
        self.inner.lock().insert(id.clone(), cluster);
        id
    }

    pub fn get(&self, id: &ClusterId) -> Option<FlinkCluster> {
        self.inner.lock().get(id).cloned()
    }

    /// Mutate the cached snapshot in place. Returns `None` when the cluster
    /// is not cached.
    pub fn update<T>(&self, id: &ClusterId, f: impl FnOnce(&mut FlinkCluster) -> T) -> Option<T> {
        self.inner.lock().get_mut(id).map(f)
    }

    pub fn remove(&self, id: &ClusterId) -> Option<FlinkCluster> {
        self.inner.lock().remove(id)
    }

    /// Drop every cluster not in `keep`
    pub fn retain(&self, keep: &[ClusterId]) {
        self.inner.lock().retain(|id, _| keep.contains(id));
    }

    pub fn ids(&self) -> Vec<ClusterId> {
        let mut ids: Vec<_> = self.inner.lock().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
