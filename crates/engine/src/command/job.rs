// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle commands. Both are confirmed on a later tick: submitting or
//! cancelling returns AWAIT, and the next run sees the job list settle.
//!
//! Any job not yet in a terminal state counts as present. A restarting or
//! cancelling job still occupies the cluster, so it is neither ignored by a
//! stop nor joined by a second submission.

use super::{resolve_address, Command};
use crate::cache::ClusterCache;
use async_trait::async_trait;
use fop_adapters::{FlinkClient, JobSubmission, KubeClient, KubeClientError};
use fop_core::{ClusterId, OperationResult};

/// Submit the bootstrap job, restoring from the stored savepoint
#[derive(Clone)]
pub struct JobStart<K, F> {
    kube: K,
    flink: F,
    cache: ClusterCache,
}

impl<K: KubeClient, F: FlinkClient> JobStart<K, F> {
    pub fn new(kube: K, flink: F, cache: ClusterCache) -> Self {
        Self { kube, flink, cache }
    }
}

#[async_trait]
impl<K: KubeClient, F: FlinkClient> Command<(), ()> for JobStart<K, F> {
    async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<()> {
        let Some(cluster) = self.cache.get(id) else {
            tracing::warn!(cluster = %id, "cluster not cached");
            return OperationResult::failed(());
        };
        let Some(bootstrap) = cluster.spec.bootstrap.as_ref() else {
            tracing::error!(cluster = %id, "no job defined");
            return OperationResult::error(());
        };

        let Ok(address) = resolve_address(&self.kube, id).await else {
            return OperationResult::failed(());
        };
        let active = match self.flink.list_active_jobs(&address).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::warn!(cluster = %id, %address, error = %e, "can't list jobs");
                return OperationResult::failed(());
            }
        };
        if !active.is_empty() {
            return match self.flink.list_running_jobs(&address).await {
                Ok(running) if !running.is_empty() => {
                    tracing::debug!(cluster = %id, jobs = running.len(), "job running");
                    OperationResult::success(())
                }
                Ok(_) => {
                    tracing::info!(cluster = %id, jobs = active.len(), "job not running yet");
                    OperationResult::awaiting(())
                }
                Err(e) => {
                    tracing::warn!(cluster = %id, %address, error = %e, "can't list running jobs");
                    OperationResult::failed(())
                }
            };
        }

        let submission = JobSubmission {
            jar_id: bootstrap.jar_id.clone(),
            entry_class: bootstrap.class_name.clone(),
            arguments: bootstrap.arguments.clone(),
            parallelism: cluster.spec.parallelism(),
            savepoint_path: cluster
                .status
                .as_ref()
                .and_then(|status| status.savepoint_path())
                .map(str::to_string),
        };
        match self.flink.submit_job(&address, &submission).await {
            Ok(()) => {
                tracing::info!(
                    cluster = %id,
                    jar_id = %submission.jar_id,
                    parallelism = submission.parallelism,
                    savepoint = submission.savepoint_path.as_deref().unwrap_or(""),
                    "job submitted"
                );
                OperationResult::awaiting(())
            }
            Err(e) => {
                tracing::warn!(cluster = %id, error = %e, "can't submit job");
                OperationResult::failed(())
            }
        }
    }
}

/// Cancel every job not yet in a terminal state
#[derive(Clone)]
pub struct JobStop<K, F> {
    kube: K,
    flink: F,
}

impl<K: KubeClient, F: FlinkClient> JobStop<K, F> {
    pub fn new(kube: K, flink: F) -> Self {
        Self { kube, flink }
    }
}

#[async_trait]
impl<K: KubeClient, F: FlinkClient> Command<(), ()> for JobStop<K, F> {
    async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<()> {
        let address = match resolve_address(&self.kube, id).await {
            Ok(address) => address,
            // No job manager service means no job left to stop
            Err(KubeClientError::AddressNotFound(_)) => return OperationResult::success(()),
            Err(_) => return OperationResult::failed(()),
        };

        let jobs = match self.flink.list_active_jobs(&address).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::warn!(cluster = %id, %address, error = %e, "can't list jobs");
                return OperationResult::failed(());
            }
        };
        if jobs.is_empty() {
            return OperationResult::success(());
        }

        for job_id in &jobs {
            if let Err(e) = self.flink.cancel_job(&address, job_id).await {
                tracing::warn!(cluster = %id, %job_id, error = %e, "can't cancel job");
                return OperationResult::failed(());
            }
            tracing::info!(cluster = %id, %job_id, "job cancelled");
        }
        OperationResult::awaiting(())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
