// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Savepoint request bookkeeping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One in-flight asynchronous savepoint against a job of the managed cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavepointRequest {
    pub job_id: String,
    pub trigger_id: String,
}

impl SavepointRequest {
    pub fn new(job_id: impl Into<String>, trigger_id: impl Into<String>) -> Self {
        Self { job_id: job_id.into(), trigger_id: trigger_id.into() }
    }
}

impl std::fmt::Display for SavepointRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.job_id, self.trigger_id)
    }
}

/// Parameters for triggering a savepoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavepointOptions {
    /// Directory the managed cluster writes the savepoint into. `None` uses
    /// the cluster's configured default.
    pub target_path: Option<String>,
}
