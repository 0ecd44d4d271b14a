// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`FlinkClient`] over the job manager's REST API.

use super::http;
use super::{
    is_terminal_job_state, FlinkAddress, FlinkClient, FlinkClientError, JobSubmission,
    SavepointStatus, SavepointTriggered,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default budget for one REST call, connect included
pub const DEFAULT_REST_TIMEOUT: Duration = Duration::from_millis(20_000);

#[derive(Clone, Debug)]
pub struct HttpFlinkClient {
    timeout: Duration,
}

impl Default for HttpFlinkClient {
    fn default() -> Self {
        Self { timeout: DEFAULT_REST_TIMEOUT }
    }
}

impl HttpFlinkClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JobsOverview {
    #[serde(default)]
    jobs: Vec<JobIdWithStatus>,
}

#[derive(Debug, Deserialize)]
struct JobIdWithStatus {
    id: String,
    status: String,
}

#[derive(Debug, Serialize)]
struct SavepointTriggerBody<'a> {
    #[serde(rename = "target-directory", skip_serializing_if = "Option::is_none")]
    target_directory: Option<&'a str>,
    #[serde(rename = "cancel-job")]
    cancel_job: bool,
}

#[derive(Debug, Deserialize)]
struct TriggerResponse {
    #[serde(rename = "request-id")]
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct AsynchronousOperationResult {
    status: QueueStatus,
}

#[derive(Debug, Deserialize)]
struct QueueStatus {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CheckpointingStatistics {
    #[serde(default)]
    latest: Option<LatestCheckpoints>,
}

#[derive(Debug, Deserialize)]
struct LatestCheckpoints {
    #[serde(default)]
    savepoint: Option<CompletedCheckpoint>,
}

#[derive(Debug, Deserialize)]
struct CompletedCheckpoint {
    #[serde(default)]
    external_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JarRunRequest<'a> {
    entry_class: &'a str,
    program_args: String,
    parallelism: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    savepoint_path: Option<&'a str>,
    allow_non_restored_state: bool,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FlinkClientError> {
    serde_json::from_str(body).map_err(|e| FlinkClientError::Decode(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<String, FlinkClientError> {
    serde_json::to_string(value).map_err(|e| FlinkClientError::Decode(e.to_string()))
}

fn jobs_where(
    body: &str,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<String>, FlinkClientError> {
    let overview: JobsOverview = decode(body)?;
    Ok(overview.jobs.into_iter().filter(|job| keep(&job.status)).map(|job| job.id).collect())
}

fn running_jobs(body: &str) -> Result<Vec<String>, FlinkClientError> {
    jobs_where(body, |status| status == "RUNNING")
}

fn active_jobs(body: &str) -> Result<Vec<String>, FlinkClientError> {
    jobs_where(body, |status| !is_terminal_job_state(status))
}

fn savepoint_in_progress(body: &str) -> Result<SavepointStatus, FlinkClientError> {
    let result: AsynchronousOperationResult = decode(body)?;
    Ok(SavepointStatus { in_progress: result.status.id == "IN_PROGRESS" })
}

/// Older job managers quote the path; blank paths mean no savepoint.
fn latest_savepoint(body: &str) -> Result<Option<String>, FlinkClientError> {
    let stats: CheckpointingStatistics = decode(body)?;
    Ok(stats
        .latest
        .and_then(|latest| latest.savepoint)
        .and_then(|savepoint| savepoint.external_path)
        .map(|path| path.trim_matches('"').trim().to_string())
        .filter(|path| !path.is_empty()))
}

#[async_trait]
impl FlinkClient for HttpFlinkClient {
    async fn list_running_jobs(
        &self,
        address: &FlinkAddress,
    ) -> Result<Vec<String>, FlinkClientError> {
        let body = http::get(address, "/jobs", self.timeout).await?;
        running_jobs(&body)
    }

    async fn list_active_jobs(
        &self,
        address: &FlinkAddress,
    ) -> Result<Vec<String>, FlinkClientError> {
        let body = http::get(address, "/jobs", self.timeout).await?;
        active_jobs(&body)
    }

    async fn trigger_savepoint(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        target_path: Option<&str>,
    ) -> Result<SavepointTriggered, FlinkClientError> {
        let request = encode(&SavepointTriggerBody { target_directory: target_path, cancel_job: false })?;
        let path = format!("/jobs/{}/savepoints", job_id);
        let body = http::post(address, &path, &request, self.timeout).await?;
        let response: TriggerResponse = decode(&body)?;
        tracing::debug!(%address, job_id, request_id = %response.request_id, "savepoint triggered");
        Ok(SavepointTriggered { job_id: job_id.to_string(), request_id: response.request_id })
    }

    async fn savepoint_status(
        &self,
        address: &FlinkAddress,
        job_id: &str,
        request_id: &str,
    ) -> Result<SavepointStatus, FlinkClientError> {
        let path = format!("/jobs/{}/savepoints/{}", job_id, request_id);
        let body = http::get(address, &path, self.timeout).await?;
        savepoint_in_progress(&body)
    }

    async fn latest_savepoint_path(
        &self,
        address: &FlinkAddress,
        job_id: &str,
    ) -> Result<Option<String>, FlinkClientError> {
        let path = format!("/jobs/{}/checkpoints", job_id);
        let body = http::get(address, &path, self.timeout).await?;
        latest_savepoint(&body)
    }

    async fn submit_job(
        &self,
        address: &FlinkAddress,
        submission: &JobSubmission,
    ) -> Result<(), FlinkClientError> {
        let request = encode(&JarRunRequest {
            entry_class: &submission.entry_class,
            program_args: submission.arguments.join(" "),
            parallelism: submission.parallelism,
            savepoint_path: submission.savepoint_path.as_deref(),
            allow_non_restored_state: false,
        })?;
        let path = format!("/jars/{}/run", submission.jar_id);
        http::post(address, &path, &request, self.timeout).await?;
        tracing::debug!(%address, jar_id = %submission.jar_id, "job submitted");
        Ok(())
    }

    async fn cancel_job(&self, address: &FlinkAddress, job_id: &str) -> Result<(), FlinkClientError> {
        let path = format!("/jobs/{}?mode=cancel", job_id);
        http::patch(address, &path, self.timeout).await?;
        tracing::debug!(%address, job_id, "job cancel requested");
        Ok(())
    }
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
