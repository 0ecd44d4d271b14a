// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FlinkCluster` custom resource.
//!
//! The spec is the desired cluster shape written by users. The status block
//! is owned by the operator: it carries the task sequence, the coarse
//! cluster phase, digests of the last applied spec and the savepoint
//! bookkeeping. Status fields are only reachable through the mutators in
//! [`crate::status`], which keep the operator timestamp current.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::digest::Digests;
use crate::savepoint::SavepointRequest;
use crate::task::{ClusterStatus, ClusterTask, TaskStatus};

/// Desired state of a managed Flink cluster
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "nextbreakpoint.com",
    version = "v1",
    kind = "FlinkCluster",
    plural = "flinkclusters",
    shortname = "fc",
    status = "FlinkClusterStatus",
    namespaced,
    derive = "PartialEq",
    printcolumn = r#"{"name":"Task","type":"string","jsonPath":".status.taskStatus"}"#,
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.clusterStatus"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct FlinkClusterSpec {
    /// Number of task manager pods
    #[serde(default = "default_task_managers")]
    pub task_managers: i32,

    #[serde(default)]
    pub runtime: RuntimeSpec,

    #[serde(default)]
    pub job_manager: JobManagerSpec,

    #[serde(default)]
    pub task_manager: TaskManagerSpec,

    /// Job to run on the cluster. A cluster without one is a session cluster
    /// and never takes savepoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapSpec>,

    #[serde(default)]
    pub operator: OperatorSpec,
}

fn default_task_managers() -> i32 {
    1
}

impl FlinkClusterSpec {
    /// Job parallelism: every slot of every task manager. Saturates rather
    /// than overflowing on absurd user input.
    pub fn parallelism(&self) -> i32 {
        self.task_managers.saturating_mul(self.task_manager.task_slots)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSpec {
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobManagerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_cpus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_memory: Option<String>,
    /// How the REST endpoint is exposed (ClusterIP, NodePort)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_mode: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerSpec {
    #[serde(default = "default_task_slots")]
    pub task_slots: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_cpus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_memory: Option<String>,
}

fn default_task_slots() -> i32 {
    1
}

impl Default for TaskManagerSpec {
    fn default() -> Self {
        Self { task_slots: default_task_slots(), required_cpus: None, required_memory: None }
    }
}

/// Job submitted to the cluster once it is up
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSpec {
    /// Id of an uploaded JAR on the job manager
    pub jar_id: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum SavepointMode {
    /// Periodic savepoints, and a savepoint before operator-initiated restarts
    #[default]
    Automatic,
    /// Savepoints only on request
    Manual,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSpec {
    #[serde(default)]
    pub savepoint_mode: SavepointMode,
    /// Seconds between periodic savepoints; unset disables them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savepoint_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savepoint_target_path: Option<String>,
}

/// Operator-owned status block
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlinkClusterStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) task_sequence: Vec<ClusterTask>,
    #[serde(default)]
    pub(crate) task_index: usize,
    #[serde(default)]
    pub(crate) task_status: TaskStatus,
    #[serde(default)]
    pub(crate) task_attempts: u32,
    #[serde(default)]
    pub(crate) cluster_status: ClusterStatus,
    /// Logical clock, advanced by every status mutation
    #[serde(default)]
    pub(crate) operator_timestamp: u64,
    /// Advanced by every savepoint bookkeeping change
    #[serde(default)]
    pub(crate) savepoint_timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) savepoint_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) savepoint_request: Option<SavepointRequest>,
    #[serde(default)]
    pub(crate) digests: Digests,
    /// Timestamp of the last manual action the operator processed
    #[serde(default)]
    pub(crate) action_timestamp: u64,
    #[serde(default)]
    pub(crate) task_managers: i32,
    #[serde(default)]
    pub(crate) task_slots: i32,
}

crate::builder! {
    pub struct FlinkClusterSpecBuilder => FlinkClusterSpec {
        set {
            task_managers: i32 = 1,
            runtime: RuntimeSpec = RuntimeSpec {
                image: "flink:1.9.2".to_string(),
                pull_policy: None,
            },
            job_manager: JobManagerSpec = JobManagerSpec::default(),
            task_manager: TaskManagerSpec = TaskManagerSpec::default(),
            operator: OperatorSpec = OperatorSpec::default(),
        }
        option {
            bootstrap: BootstrapSpec = Some(BootstrapSpec {
                jar_id: "test.jar".to_string(),
                class_name: "com.example.Job".to_string(),
                arguments: vec![],
            }),
        }
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod tests;
