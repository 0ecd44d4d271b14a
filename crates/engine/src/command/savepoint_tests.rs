// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_adapters::{
    FakeFlinkClient, FakeKubeClient, FlinkAddress, FlinkCall, FlinkClientError, FlinkOp,
    KubeClientError, KubeOp,
};
use fop_core::test_support::a_flink_cluster;
use fop_core::{FakeClock, ResultStatus};

struct Fixture {
    kube: FakeKubeClient,
    flink: FakeFlinkClient,
    id: ClusterId,
}

fn fixture() -> Fixture {
    let kube = FakeKubeClient::new();
    kube.insert_cluster(a_flink_cluster("test", "flink"));
    let id = ClusterId::new("flink", "test");
    kube.set_address(&id, FlinkAddress::new("localhost", 8081));
    Fixture { kube, flink: FakeFlinkClient::new(), id }
}

impl Fixture {
    fn trigger(&self) -> SavepointTrigger<FakeKubeClient, FakeFlinkClient> {
        SavepointTrigger::new(self.kube.clone(), self.flink.clone())
    }

    fn status(&self) -> SavepointStatus<FakeKubeClient, FakeFlinkClient> {
        SavepointStatus::new(self.kube.clone(), self.flink.clone())
    }
}

// ── SavepointTrigger ────────────────────────────────────────────────────

#[tokio::test]
async fn triggers_savepoint_of_single_running_job() {
    let f = fixture();
    f.flink.set_running_jobs(&["job-a"]);

    let options = SavepointOptions { target_path: Some("s3://savepoints".to_string()) };
    let result = f.trigger().execute(&f.id, options).await;

    assert!(result.is_success());
    let request = result.output.unwrap();
    assert_eq!(request.job_id, "job-a");
    assert!(!request.trigger_id.is_empty());
    assert!(f.flink.calls().contains(&FlinkCall::TriggerSavepoint {
        address: FlinkAddress::new("localhost", 8081),
        job_id: "job-a".to_string(),
        target_path: Some("s3://savepoints".to_string()),
    }));
}

#[yare::parameterized(
    no_jobs  = { &[] },
    two_jobs = { &["job-a", "job-b"] },
)]
fn ambiguous_target_is_an_error(jobs: &[&str]) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let f = fixture();
    f.flink.set_running_jobs(jobs);

    let result = runtime.block_on(f.trigger().execute(&f.id, SavepointOptions::default()));

    assert_eq!(result, OperationResult::error(None));
    assert_eq!(f.flink.count(FlinkOp::TriggerSavepoint), 0);
}

#[tokio::test]
async fn unresolvable_address_fails_trigger() {
    let f = fixture();
    f.kube.fail(KubeOp::ResolveClusterAddress, KubeClientError::AddressNotFound("x".to_string()));

    let result = f.trigger().execute(&f.id, SavepointOptions::default()).await;

    assert_eq!(result, OperationResult::failed(None));
    assert!(f.flink.calls().is_empty());
}

#[yare::parameterized(
    list    = { FlinkOp::ListRunningJobs },
    trigger = { FlinkOp::TriggerSavepoint },
)]
fn rest_failure_fails_trigger(op: FlinkOp) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let f = fixture();
    f.flink.set_running_jobs(&["job-a"]);
    f.flink.fail(op, FlinkClientError::Timeout);

    let result = runtime.block_on(f.trigger().execute(&f.id, SavepointOptions::default()));

    assert_eq!(result.status, ResultStatus::Failed);
}

// ── SavepointStatus ─────────────────────────────────────────────────────

#[tokio::test]
async fn pending_savepoint_awaits() {
    let f = fixture();
    f.flink.set_savepoint_in_progress(true);

    let result = f.status().execute(&f.id, SavepointRequest::new("000", "XXX")).await;

    assert_eq!(result, OperationResult::awaiting(None));
    assert_eq!(f.flink.count(FlinkOp::LatestSavepointPath), 0);
}

#[tokio::test]
async fn completed_savepoint_yields_path() {
    let f = fixture();
    f.flink.set_savepoint_in_progress(false);
    f.flink.set_latest_savepoint(Some("file:/tmp/savepoint-000"));

    let result = f.status().execute(&f.id, SavepointRequest::new("000", "XXX")).await;

    assert_eq!(result, OperationResult::success(Some("file:/tmp/savepoint-000".to_string())));
    assert!(f.flink.calls().contains(&FlinkCall::SavepointStatus {
        address: FlinkAddress::new("localhost", 8081),
        job_id: "000".to_string(),
        request_id: "XXX".to_string(),
    }));
}

#[tokio::test]
async fn finished_savepoint_without_path_fails() {
    let f = fixture();
    f.flink.set_savepoint_in_progress(false);
    f.flink.set_latest_savepoint(None);

    let result = f.status().execute(&f.id, SavepointRequest::new("000", "XXX")).await;

    assert_eq!(result, OperationResult::failed(None));
}

#[yare::parameterized(
    poll = { FlinkOp::SavepointStatus },
    path = { FlinkOp::LatestSavepointPath },
)]
fn rest_failure_fails_poll(op: FlinkOp) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let f = fixture();
    f.flink.set_latest_savepoint(Some("/sp"));
    f.flink.fail(op, FlinkClientError::Http { status: 500, body: String::new() });

    let result = runtime.block_on(f.status().execute(&f.id, SavepointRequest::new("000", "XXX")));

    assert_eq!(result, OperationResult::failed(None));
}

// ── SavepointForget ─────────────────────────────────────────────────────

#[tokio::test]
async fn forget_clears_path_and_advances_savepoint_timestamp() {
    let cache = ClusterCache::new();
    let clock = FakeClock::new();
    let id = cache.insert(a_flink_cluster("test", "flink"));
    cache.update(&id, |c| c.status_mut().set_savepoint_path(Some("/sp/1".to_string()), &clock));
    let before = cache.get(&id).unwrap().status.unwrap().savepoint_timestamp();

    let result = SavepointForget::new(cache.clone(), clock).execute(&id, ()).await;

    assert!(result.is_success());
    let status = cache.get(&id).unwrap().status.unwrap();
    assert_eq!(status.savepoint_path(), None);
    assert!(status.savepoint_timestamp() > before);
}

#[tokio::test]
async fn forget_of_uncached_cluster_fails() {
    let result = SavepointForget::new(ClusterCache::new(), FakeClock::new())
        .execute(&ClusterId::new("flink", "test"), ())
        .await;
    assert_eq!(result, OperationResult::failed(()));
}
