// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Managed cluster identity.

use kube::ResourceExt;
use serde::{Deserialize, Serialize};

use crate::crd::FlinkCluster;

/// Stable key identifying one managed cluster: the namespace and name of
/// its `FlinkCluster` resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId {
    pub namespace: String,
    pub name: String,
}

impl ClusterId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }

    /// Identity of a resource as read from the API server.
    ///
    /// Cluster-scoped reads never happen for `FlinkCluster`, so a missing
    /// namespace maps to `default`.
    pub fn of(cluster: &FlinkCluster) -> Self {
        Self::new(cluster.namespace().unwrap_or_else(|| "default".to_string()), cluster.name_any())
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
