// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes API access for `FlinkCluster` resources.
//!
//! # Naming
//!
//! The job manager of cluster `<name>` is reached through the service
//! `flink-jobmanager-<name>`. Every resource belonging to a cluster carries
//! the labels `component=flink` and `name=<name>`.

mod k8s;

pub use k8s::KubeClusterClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeKubeClient, KubeCall, KubeOp};

use crate::flink::FlinkAddress;
use async_trait::async_trait;
use fop_core::{ClusterId, FlinkCluster};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from Kubernetes API operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KubeClientError {
    #[error("not found: {0}")]
    NotFound(String),
    /// The resource changed since it was read
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("no address for cluster {0}")]
    AddressNotFound(String),
    #[error("kubernetes API error: {0}")]
    Api(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// How the operator reaches job managers from where it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlinkOptions {
    /// Host to connect to instead of the service address
    pub hostname: Option<String>,
    /// Local port forwarded to the job manager's REST port
    pub port_forward: Option<u16>,
    /// Connect through the service's node port
    pub use_node_port: bool,
}

pub fn job_manager_service_name(cluster_name: &str) -> String {
    format!("flink-jobmanager-{}", cluster_name)
}

pub fn cluster_selector(cluster_name: &str) -> String {
    format!("component=flink,name={}", cluster_name)
}

/// Adapter for the Kubernetes API server
#[async_trait]
pub trait KubeClient: Clone + Send + Sync + 'static {
    /// REST address of the cluster's job manager
    async fn resolve_cluster_address(&self, id: &ClusterId)
        -> Result<FlinkAddress, KubeClientError>;

    async fn get_cluster(&self, id: &ClusterId) -> Result<FlinkCluster, KubeClientError>;

    /// Clusters in one namespace, or in all namespaces when `None`
    async fn list_clusters(&self, namespace: Option<&str>)
        -> Result<Vec<FlinkCluster>, KubeClientError>;

    /// Merge the given annotations into the resource
    async fn update_annotations(
        &self,
        id: &ClusterId,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), KubeClientError>;

    /// Replace the status block of `cluster`.
    ///
    /// Conditional on the resource version carried by `cluster`: fails with
    /// [`KubeClientError::Conflict`] when the stored resource moved on.
    async fn update_status(&self, cluster: &FlinkCluster) -> Result<FlinkCluster, KubeClientError>;

    /// Delete the pods and services labelled as belonging to the cluster
    async fn delete_cluster_resources(&self, id: &ClusterId) -> Result<(), KubeClientError>;
}
