// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Default interval between two reconcile ticks of one cluster
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5_000);

/// Default number of unsuccessful runs after which a task is failed
pub const DEFAULT_MAX_TASK_ATTEMPTS: u32 = 30;

/// Reconciler knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Namespace to watch; all namespaces when `None`
    pub namespace: Option<String>,
    pub tick_interval: Duration,
    pub max_task_attempts: u32,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_task_attempts: DEFAULT_MAX_TASK_ATTEMPTS,
        }
    }
}

impl OperatorConfig {
    fop_core::setters! {
        set { tick_interval: Duration, max_task_attempts: u32 }
        option { namespace: String }
    }
}
