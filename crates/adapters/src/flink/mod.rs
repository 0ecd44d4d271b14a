// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flink REST client.
//!
//! Every call takes the address of the job manager explicitly: the operator
//! resolves it per reconcile tick, since services and node ports move.

mod http;
mod rest;

pub use rest::{HttpFlinkClient, DEFAULT_REST_TIMEOUT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFlinkClient, FlinkCall, FlinkOp};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors from Flink REST calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlinkClientError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Host and port of a job manager's REST endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlinkAddress {
    pub host: String,
    pub port: u16,
}

impl FlinkAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for FlinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Job states a job never leaves
pub const TERMINAL_JOB_STATES: [&str; 3] = ["FINISHED", "CANCELED", "FAILED"];

pub fn is_terminal_job_state(state: &str) -> bool {
    TERMINAL_JOB_STATES.contains(&state)
}

/// Handle returned when a savepoint has been triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavepointTriggered {
    pub job_id: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavepointStatus {
    pub in_progress: bool,
}

/// A JAR run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    pub jar_id: String,
    pub entry_class: String,
    pub arguments: Vec<String>,
    pub parallelism: i32,
    /// Savepoint to restore from
    pub savepoint_path: Option<String>,
}

/// Adapter for a Flink job manager's REST API
#[async_trait]
pub trait FlinkClient: Clone + Send + Sync + 'static {
    /// Ids of the jobs currently in state RUNNING
    async fn list_running_jobs(&self, address: &FlinkAddress)
        -> Result<Vec<String>, FlinkClientError>;

    /// Ids of the jobs not yet in a terminal state: created, restarting and
    /// cancelling jobs still hold the cluster's slots.
    async fn list_active_jobs(&self, address: &FlinkAddress)
        -> Result<Vec<String>, FlinkClientError>;

    /// Ask the job manager to write a savepoint without cancelling the job
    async fn trigger_savepoint(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        target_path: Option<&str>,
    ) -> Result<SavepointTriggered, FlinkClientError>;

    async fn savepoint_status(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        request_id: &str,
    ) -> Result<SavepointStatus, FlinkClientError>;

    /// Path of the most recent completed savepoint, if any
    async fn latest_savepoint_path(
        &self,
        address: &FlinkAddress,
        job_id: &str,
    ) -> Result<Option<String>, FlinkClientError>;

    async fn submit_job(
        &self,
        address: &FlinkAddress,
        submission: &JobSubmission,
    ) -> Result<(), FlinkClientError>;

    async fn cancel_job(&self, address: &FlinkAddress, job_id: &str)
        -> Result<(), FlinkClientError>;
}
