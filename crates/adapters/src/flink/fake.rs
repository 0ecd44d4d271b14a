// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory Flink job manager for tests.

use super::{
    is_terminal_job_state, FlinkAddress, FlinkClient, FlinkClientError, JobSubmission,
    SavepointStatus, SavepointTriggered,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Operation selector for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlinkOp {
    ListRunningJobs,
    ListActiveJobs,
    TriggerSavepoint,
    SavepointStatus,
    LatestSavepointPath,
    SubmitJob,
    CancelJob,
}

/// Recorded Flink call
#[derive(Debug, Clone, PartialEq)]
pub enum FlinkCall {
    ListRunningJobs { address: FlinkAddress },
    ListActiveJobs { address: FlinkAddress },
    TriggerSavepoint { address: FlinkAddress, job_id: String, target_path: Option<String> },
    SavepointStatus { address: FlinkAddress, job_id: String, request_id: String },
    LatestSavepointPath { address: FlinkAddress, job_id: String },
    SubmitJob { address: FlinkAddress, submission: JobSubmission },
    CancelJob { address: FlinkAddress, job_id: String },
}

impl FlinkCall {
    pub fn op(&self) -> FlinkOp {
        match self {
            FlinkCall::ListRunningJobs { .. } => FlinkOp::ListRunningJobs,
            FlinkCall::ListActiveJobs { .. } => FlinkOp::ListActiveJobs,
            FlinkCall::TriggerSavepoint { .. } => FlinkOp::TriggerSavepoint,
            FlinkCall::SavepointStatus { .. } => FlinkOp::SavepointStatus,
            FlinkCall::LatestSavepointPath { .. } => FlinkOp::LatestSavepointPath,
            FlinkCall::SubmitJob { .. } => FlinkOp::SubmitJob,
            FlinkCall::CancelJob { .. } => FlinkOp::CancelJob,
        }
    }
}

#[derive(Default)]
struct FakeFlinkState {
    /// Job ids with their Flink job state
    jobs: Vec<(String, String)>,
    savepoint_in_progress: bool,
    latest_savepoint: Option<String>,
    next_id: u32,
    failures: HashMap<FlinkOp, FlinkClientError>,
    calls: Vec<FlinkCall>,
}

impl FakeFlinkState {
    fn jobs_where(&self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        self.jobs.iter().filter(|(_, state)| keep(state)).map(|(id, _)| id.clone()).collect()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check(&self, op: FlinkOp) -> Result<(), FlinkClientError> {
        match self.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Fake Flink client for testing.
///
/// Submitting a job adds a RUNNING job and cancelling one moves it to
/// CANCELED, so multi-step flows observe their own effects.
#[derive(Clone, Default)]
pub struct FakeFlinkClient {
    inner: Arc<Mutex<FakeFlinkState>>,
}

impl FakeFlinkClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every job with the given RUNNING ones
    pub fn set_running_jobs(&self, jobs: &[&str]) {
        self.inner.lock().jobs =
            jobs.iter().map(|j| (j.to_string(), "RUNNING".to_string())).collect();
    }

    /// Add a job, or move an existing one, to `state`
    pub fn set_job_state(&self, job_id: &str, state: &str) {
        let mut inner = self.inner.lock();
        match inner.jobs.iter_mut().find(|(id, _)| id == job_id) {
            Some((_, current)) => *current = state.to_string(),
            None => inner.jobs.push((job_id.to_string(), state.to_string())),
        }
    }

    pub fn running_jobs(&self) -> Vec<String> {
        self.inner.lock().jobs_where(|state| state == "RUNNING")
    }

    pub fn active_jobs(&self) -> Vec<String> {
        self.inner.lock().jobs_where(|state| !is_terminal_job_state(state))
    }

    pub fn set_savepoint_in_progress(&self, in_progress: bool) {
        self.inner.lock().savepoint_in_progress = in_progress;
    }

    pub fn set_latest_savepoint(&self, path: Option<&str>) {
        self.inner.lock().latest_savepoint = path.map(str::to_string);
    }

    /// Make every call of `op` fail until cleared
    pub fn fail(&self, op: FlinkOp, err: FlinkClientError) {
        self.inner.lock().failures.insert(op, err);
    }

    pub fn clear_failure(&self, op: FlinkOp) {
        self.inner.lock().failures.remove(&op);
    }

    pub fn calls(&self) -> Vec<FlinkCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, op: FlinkOp) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.op() == op).count()
    }
}

#[async_trait]
impl FlinkClient for FakeFlinkClient {
    async fn list_running_jobs(
        &self,
        address: &FlinkAddress,
    ) -> Result<Vec<String>, FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::ListRunningJobs { address: address.clone() });
        state.check(FlinkOp::ListRunningJobs)?;
        Ok(state.jobs_where(|s| s == "RUNNING"))
    }

    async fn list_active_jobs(
        &self,
        address: &FlinkAddress,
    ) -> Result<Vec<String>, FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::ListActiveJobs { address: address.clone() });
        state.check(FlinkOp::ListActiveJobs)?;
        Ok(state.jobs_where(|s| !is_terminal_job_state(s)))
    }

    async fn trigger_savepoint(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        target_path: Option<&str>,
    ) -> Result<SavepointTriggered, FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::TriggerSavepoint {
            address: address.clone(),
            job_id: job_id.to_string(),
            target_path: target_path.map(str::to_string),
        });
        state.check(FlinkOp::TriggerSavepoint)?;
        let request_id = state.next_id("trigger");
        Ok(SavepointTriggered { job_id: job_id.to_string(), request_id })
    }

    async fn savepoint_status(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        request_id: &str,
    ) -> Result<SavepointStatus, FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::SavepointStatus {
            address: address.clone(),
            job_id: job_id.to_string(),
            request_id: request_id.to_string(),
        });
        state.check(FlinkOp::SavepointStatus)?;
        Ok(SavepointStatus { in_progress: state.savepoint_in_progress })
    }

    async fn latest_savepoint_path(
        &self,
        address: &FlinkAddress,
        job_id: &str,
    ) -> Result<Option<String>, FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::LatestSavepointPath {
            address: address.clone(),
            job_id: job_id.to_string(),
        });
        state.check(FlinkOp::LatestSavepointPath)?;
        Ok(state.latest_savepoint.clone())
    }

    async fn submit_job(
        &self,
        address: &FlinkAddress,
        submission: &JobSubmission,
    ) -> Result<(), FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::SubmitJob {
            address: address.clone(),
            submission: submission.clone(),
        });
        state.check(FlinkOp::SubmitJob)?;
        let job_id = state.next_id("job");
        state.jobs.push((job_id, "RUNNING".to_string()));
        Ok(())
    }

    async fn cancel_job(&self, address: &FlinkAddress, job_id: &str) -> Result<(), FlinkClientError> {
        let mut state = self.inner.lock();
        state.calls.push(FlinkCall::CancelJob { address: address.clone(), job_id: job_id.to_string() });
        state.check(FlinkOp::CancelJob)?;
        if let Some((_, job_state)) = state.jobs.iter_mut().find(|(id, _)| id == job_id) {
            *job_state = "CANCELED".to_string();
        }
        Ok(())
    }
}
