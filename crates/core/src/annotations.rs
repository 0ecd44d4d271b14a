// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual-action annotations.
//!
//! Users request lifecycle changes by writing an action, two flags and a
//! timestamp into the resource's annotations. The operator compares the
//! timestamp with the last one it processed to decide whether the request
//! is new.

use kube::ResourceExt;
use std::str::FromStr;
use thiserror::Error;

use crate::clock::Clock;
use crate::crd::FlinkCluster;

pub const MANUAL_ACTION: &str = "operator.nextbreakpoint.com/manualAction";
pub const WITHOUT_SAVEPOINT: &str = "operator.nextbreakpoint.com/withoutSavepoint";
pub const DELETE_RESOURCES: &str = "operator.nextbreakpoint.com/deleteResources";
pub const ACTION_TIMESTAMP: &str = "operator.nextbreakpoint.com/actionTimestamp";

/// Lifecycle change requested from outside the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManualAction {
    #[default]
    None,
    Start,
    Stop,
    Suspend,
    Terminate,
    TriggerSavepoint,
    ForgetSavepoint,
}

crate::simple_display! {
    ManualAction {
        None => "NONE",
        Start => "START",
        Stop => "STOP",
        Suspend => "SUSPEND",
        Terminate => "TERMINATE",
        TriggerSavepoint => "TRIGGER_SAVEPOINT",
        ForgetSavepoint => "FORGET_SAVEPOINT",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown manual action: {0}")]
pub struct UnknownManualAction(pub String);

impl FromStr for ManualAction {
    type Err = UnknownManualAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" | "" => Ok(ManualAction::None),
            "START" => Ok(ManualAction::Start),
            "STOP" => Ok(ManualAction::Stop),
            "SUSPEND" => Ok(ManualAction::Suspend),
            "TERMINATE" => Ok(ManualAction::Terminate),
            "TRIGGER_SAVEPOINT" => Ok(ManualAction::TriggerSavepoint),
            "FORGET_SAVEPOINT" => Ok(ManualAction::ForgetSavepoint),
            other => Err(UnknownManualAction(other.to_string())),
        }
    }
}

/// The four annotation values read as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualActionAnnotation {
    pub action: ManualAction,
    pub without_savepoint: bool,
    pub delete_resources: bool,
    /// Epoch milliseconds of the request; zero when never set
    pub timestamp: u64,
}

impl ManualActionAnnotation {
    /// Read the annotations of a cluster. Missing or malformed values read
    /// as their defaults; an unknown action reads as [`ManualAction::None`].
    pub fn of(cluster: &FlinkCluster) -> Self {
        let annotations = cluster.annotations();
        let flag = |key: &str| annotations.get(key).is_some_and(|v| v == "true");
        Self {
            action: annotations
                .get(MANUAL_ACTION)
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            without_savepoint: flag(WITHOUT_SAVEPOINT),
            delete_resources: flag(DELETE_RESOURCES),
            timestamp: annotations
                .get(ACTION_TIMESTAMP)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// True when this request has not been processed yet.
    pub fn is_newer_than(&self, processed_timestamp: u64) -> bool {
        self.timestamp > processed_timestamp
    }
}

impl FlinkCluster {
    pub fn manual_action(&self) -> ManualAction {
        ManualActionAnnotation::of(self).action
    }

    pub fn set_manual_action(&mut self, action: ManualAction, clock: &impl Clock) {
        self.annotations_mut().insert(MANUAL_ACTION.to_string(), action.to_string());
        self.touch_action(clock);
    }

    pub fn is_without_savepoint(&self) -> bool {
        ManualActionAnnotation::of(self).without_savepoint
    }

    pub fn set_without_savepoint(&mut self, without_savepoint: bool, clock: &impl Clock) {
        self.annotations_mut()
            .insert(WITHOUT_SAVEPOINT.to_string(), without_savepoint.to_string());
        self.touch_action(clock);
    }

    pub fn is_delete_resources(&self) -> bool {
        ManualActionAnnotation::of(self).delete_resources
    }

    pub fn set_delete_resources(&mut self, delete_resources: bool, clock: &impl Clock) {
        self.annotations_mut()
            .insert(DELETE_RESOURCES.to_string(), delete_resources.to_string());
        self.touch_action(clock);
    }

    /// Write a whole request with a single timestamp.
    pub fn set_manual_action_request(
        &mut self,
        action: ManualAction,
        without_savepoint: bool,
        delete_resources: bool,
        clock: &impl Clock,
    ) {
        let annotations = self.annotations_mut();
        annotations.insert(MANUAL_ACTION.to_string(), action.to_string());
        annotations.insert(WITHOUT_SAVEPOINT.to_string(), without_savepoint.to_string());
        annotations.insert(DELETE_RESOURCES.to_string(), delete_resources.to_string());
        self.touch_action(clock);
    }

    pub fn action_timestamp(&self) -> u64 {
        ManualActionAnnotation::of(self).timestamp
    }

    fn touch_action(&mut self, clock: &impl Clock) {
        let next = clock.tick_after(self.action_timestamp());
        self.annotations_mut().insert(ACTION_TIMESTAMP.to_string(), next.to_string());
    }
}

#[cfg(test)]
#[path = "annotations_tests.rs"]
mod tests;
