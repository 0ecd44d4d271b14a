// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle tasks and the status enums stored next to them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One discrete step in a cluster's lifecycle plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum ClusterTask {
    /// Idle with nothing running. Also the task of an empty sequence.
    #[default]
    ClusterHalted,
    InitialiseCluster,
    StartingCluster,
    /// Idle with the job running.
    ClusterRunning,
    CreatingSavepoint,
    TriggerSavepoint,
    StoppingCluster,
    TerminatingCluster,
    RescalingCluster,
}

impl ClusterTask {
    /// Resting tasks end a plan: once reached, the reconciler only watches
    /// for reasons to start a new one.
    pub fn is_resting(&self) -> bool {
        matches!(self, ClusterTask::ClusterHalted | ClusterTask::ClusterRunning)
    }
}

crate::simple_display! {
    ClusterTask {
        ClusterHalted => "ClusterHalted",
        InitialiseCluster => "InitialiseCluster",
        StartingCluster => "StartingCluster",
        ClusterRunning => "ClusterRunning",
        CreatingSavepoint => "CreatingSavepoint",
        TriggerSavepoint => "TriggerSavepoint",
        StoppingCluster => "StoppingCluster",
        TerminatingCluster => "TerminatingCluster",
        RescalingCluster => "RescalingCluster",
    }
}

/// Progress of the current task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TaskStatus {
    /// Completed or resting; the sequence may advance.
    #[default]
    Idle,
    /// Selected but its command has not run yet.
    Executing,
    /// Its command reported a pending condition; re-run next tick.
    Awaiting,
    /// Gave up; the reconciler replaces the plan with a recovery plan.
    Failed,
}

crate::simple_display! {
    TaskStatus {
        Idle => "Idle",
        Executing => "Executing",
        Awaiting => "Awaiting",
        Failed => "Failed",
    }
}

/// Coarse lifecycle phase, independent of the task sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ClusterStatus {
    #[default]
    Unknown,
    Starting,
    Running,
    Checkpointing,
    Stopping,
    Stopped,
    Suspended,
    Terminated,
    Failed,
}

impl ClusterStatus {
    /// True when no job is expected to be running.
    pub fn is_halted(&self) -> bool {
        matches!(
            self,
            ClusterStatus::Unknown
                | ClusterStatus::Stopped
                | ClusterStatus::Suspended
                | ClusterStatus::Terminated
                | ClusterStatus::Failed
        )
    }
}

crate::simple_display! {
    ClusterStatus {
        Unknown => "Unknown",
        Starting => "Starting",
        Running => "Running",
        Checkpointing => "Checkpointing",
        Stopping => "Stopping",
        Stopped => "Stopped",
        Suspended => "Suspended",
        Terminated => "Terminated",
        Failed => "Failed",
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
