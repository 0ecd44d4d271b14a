// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fopd: reconciles `FlinkCluster` resources until interrupted

use std::process::ExitCode;

use fop_adapters::{HttpFlinkClient, KubeClusterClient};
use fop_core::SystemClock;
use fop_daemon::{env, Daemon, LifecycleError, Settings};
use fop_engine::{ClusterCache, OperatorDeps, Reconciler};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_new(env::log_filter())
        .unwrap_or_else(|_| EnvFilter::new(env::DEFAULT_LOG_FILTER));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "operator failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LifecycleError> {
    let settings = Settings::from_env()?;
    let kube = KubeClusterClient::new(settings.flink.clone()).await?;
    let deps = OperatorDeps {
        kube,
        flink: HttpFlinkClient::new(settings.rest_timeout),
        clock: SystemClock,
        cache: ClusterCache::new(),
    };
    let daemon = Daemon::new(Reconciler::new(deps, settings.operator));

    daemon
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "can't listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}
