// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Savepoint commands.
//!
//! A savepoint is taken in two halves across ticks: [`SavepointTrigger`]
//! starts it and the caller stores the returned request on the status
//! block, then [`SavepointStatus`] is polled with that request until the job
//! manager reports a result.

use super::{resolve_address, Command};
use crate::cache::ClusterCache;
use async_trait::async_trait;
use fop_adapters::{FlinkClient, KubeClient};
use fop_core::{Clock, ClusterId, OperationResult, SavepointOptions, SavepointRequest};

/// Trigger a savepoint of the cluster's only running job
#[derive(Clone)]
pub struct SavepointTrigger<K, F> {
    kube: K,
    flink: F,
}

impl<K: KubeClient, F: FlinkClient> SavepointTrigger<K, F> {
    pub fn new(kube: K, flink: F) -> Self {
        Self { kube, flink }
    }
}

#[async_trait]
impl<K: KubeClient, F: FlinkClient> Command<SavepointOptions, Option<SavepointRequest>>
    for SavepointTrigger<K, F>
{
    async fn execute(
        &self,
        id: &ClusterId,
        options: SavepointOptions,
    ) -> OperationResult<Option<SavepointRequest>> {
        let Ok(address) = resolve_address(&self.kube, id).await else {
            return OperationResult::failed(None);
        };

        let jobs = match self.flink.list_running_jobs(&address).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::warn!(cluster = %id, %address, error = %e, "can't list running jobs");
                return OperationResult::failed(None);
            }
        };

        let job_id = match jobs.as_slice() {
            [job_id] => job_id,
            [] => {
                tracing::error!(cluster = %id, "no running job to savepoint");
                return OperationResult::error(None);
            }
            _ => {
                tracing::error!(cluster = %id, jobs = jobs.len(), "more than one running job");
                return OperationResult::error(None);
            }
        };

        match self.flink.trigger_savepoint(&address, job_id, options.target_path.as_deref()).await {
            Ok(triggered) => {
                let request = SavepointRequest::new(triggered.job_id, triggered.request_id);
                tracing::info!(cluster = %id, %request, "savepoint triggered");
                OperationResult::success(Some(request))
            }
            Err(e) => {
                tracing::warn!(cluster = %id, %job_id, error = %e, "can't trigger savepoint");
                OperationResult::failed(None)
            }
        }
    }
}

/// Poll a triggered savepoint
#[derive(Clone)]
pub struct SavepointStatus<K, F> {
    kube: K,
    flink: F,
}

impl<K: KubeClient, F: FlinkClient> SavepointStatus<K, F> {
    pub fn new(kube: K, flink: F) -> Self {
        Self { kube, flink }
    }
}

#[async_trait]
impl<K: KubeClient, F: FlinkClient> Command<SavepointRequest, Option<String>>
    for SavepointStatus<K, F>
{
    async fn execute(
        &self,
        id: &ClusterId,
        request: SavepointRequest,
    ) -> OperationResult<Option<String>> {
        let Ok(address) = resolve_address(&self.kube, id).await else {
            return OperationResult::failed(None);
        };

        match self.flink.savepoint_status(&address, &request.job_id, &request.trigger_id).await {
            Ok(status) if status.in_progress => {
                tracing::debug!(cluster = %id, %request, "savepoint in progress");
                return OperationResult::awaiting(None);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(cluster = %id, %request, error = %e, "can't poll savepoint");
                return OperationResult::failed(None);
            }
        }

        match self.flink.latest_savepoint_path(&address, &request.job_id).await {
            Ok(Some(path)) => {
                tracing::info!(cluster = %id, %request, %path, "savepoint completed");
                OperationResult::success(Some(path))
            }
            Ok(None) => {
                tracing::warn!(cluster = %id, %request, "savepoint finished without a path");
                OperationResult::failed(None)
            }
            Err(e) => {
                tracing::warn!(cluster = %id, %request, error = %e, "can't read savepoint path");
                OperationResult::failed(None)
            }
        }
    }
}

/// Drop the stored savepoint path so the next start is a fresh one
#[derive(Clone)]
pub struct SavepointForget<C: Clock> {
    cache: ClusterCache,
    clock: C,
}

impl<C: Clock> SavepointForget<C> {
    pub fn new(cache: ClusterCache, clock: C) -> Self {
        Self { cache, clock }
    }
}

#[async_trait]
impl<C: Clock + 'static> Command<(), ()> for SavepointForget<C> {
    async fn execute(&self, id: &ClusterId, _: ()) -> OperationResult<()> {
        let forgotten = self.cache.update(id, |cluster| {
            let status = cluster.status_mut();
            let previous = status.savepoint_path().map(str::to_string);
            status.set_savepoint_path(None, &self.clock);
            previous
        });
        match forgotten {
            Some(previous) => {
                tracing::info!(
                    cluster = %id,
                    previous = previous.as_deref().unwrap_or(""),
                    "savepoint forgotten"
                );
                OperationResult::success(())
            }
            None => {
                tracing::warn!(cluster = %id, "cluster not cached");
                OperationResult::failed(())
            }
        }
    }
}

#[cfg(test)]
#[path = "savepoint_tests.rs"]
mod tests;
