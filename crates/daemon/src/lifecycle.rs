// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The periodic tick loop over all `FlinkCluster` resources.
//!
//! Every interval the daemon lists clusters and spawns one reconcile per
//! cluster. Distinct clusters reconcile concurrently; a cluster whose
//! previous tick is still running is skipped until it finishes.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use fop_adapters::{FlinkClient, KubeClient, KubeClientError};
use fop_core::{Clock, ClusterId};
use fop_engine::Reconciler;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::env::ConfigError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Kube(#[from] KubeClientError),
}

pub struct Daemon<K, F, C: Clock> {
    reconciler: Arc<Reconciler<K, F, C>>,
    in_flight: Arc<Mutex<HashSet<ClusterId>>>,
    ticks: Mutex<JoinSet<()>>,
}

/// Marks a cluster busy until dropped
struct InFlight {
    id: ClusterId,
    set: Arc<Mutex<HashSet<ClusterId>>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}

impl<K, F, C> Daemon<K, F, C>
where
    K: KubeClient,
    F: FlinkClient,
    C: Clock + 'static,
{
    pub fn new(reconciler: Reconciler<K, F, C>) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            ticks: Mutex::new(JoinSet::new()),
        }
    }

    /// Tick every interval until `shutdown` resolves, then wait for the
    /// ticks already running.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let config = self.reconciler.config();
        tracing::info!(
            namespace = config.namespace.as_deref().unwrap_or("*"),
            tick_interval_ms = config.tick_interval.as_millis() as u64,
            max_task_attempts = config.max_task_attempts,
            "operator started"
        );

        let mut interval = tokio::time::interval(config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::warn!(error = %e, "can't list clusters");
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("shutting down, waiting for running ticks");
        self.drain().await;
    }

    /// Spawn a reconcile for every listed cluster not already in flight.
    ///
    /// Returns the clusters a tick was started for.
    pub async fn tick(&self) -> Result<Vec<ClusterId>, LifecycleError> {
        let deps = self.reconciler.deps();
        let namespace = self.reconciler.config().namespace.as_deref();
        let clusters = deps.kube.list_clusters(namespace).await?;
        let ids: Vec<ClusterId> = clusters.iter().map(ClusterId::of).collect();
        deps.cache.retain(&ids);

        let mut ticks = self.ticks.lock();
        while let Some(result) = ticks.try_join_next() {
            log_panic(result);
        }

        let mut started = Vec::new();
        for id in ids {
            if !self.in_flight.lock().insert(id.clone()) {
                tracing::debug!(cluster = %id, "previous tick still running");
                continue;
            }
            let guard = InFlight { id: id.clone(), set: Arc::clone(&self.in_flight) };
            let reconciler = Arc::clone(&self.reconciler);
            ticks.spawn(async move {
                let guard = guard;
                match reconciler.reconcile(&guard.id).await {
                    Ok(_) => {}
                    Err(e) if e.is_conflict() => {
                        tracing::info!(cluster = %guard.id, error = %e, "status changed concurrently");
                    }
                    Err(e) => {
                        tracing::warn!(cluster = %guard.id, error = %e, "reconcile failed");
                    }
                }
            });
            started.push(id);
        }
        Ok(started)
    }

    /// Wait for every spawned tick to finish.
    pub async fn drain(&self) {
        let mut ticks = std::mem::take(&mut *self.ticks.lock());
        while let Some(result) = ticks.join_next().await {
            log_panic(result);
        }
    }
}

fn log_panic(result: Result<(), JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "reconcile task panicked");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
