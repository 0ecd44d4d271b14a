// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome vocabulary shared by every command.

/// How the reconciler should proceed after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// Side effect completed; the task may advance.
    Success,
    /// Precondition not met yet or remote operation pending; retry the same
    /// task on a later tick.
    Await,
    /// Did not succeed but may on retry or after a plan reset.
    Failed,
    /// The request is invalid for the current cluster state; retrying it
    /// verbatim cannot help.
    Error,
}

crate::simple_display! {
    ResultStatus {
        Success => "SUCCESS",
        Await => "AWAIT",
        Failed => "FAILED",
        Error => "ERROR",
    }
}

/// Status plus the command's output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult<R> {
    pub status: ResultStatus,
    pub output: R,
}

impl<R> OperationResult<R> {
    pub fn new(status: ResultStatus, output: R) -> Self {
        Self { status, output }
    }

    pub fn success(output: R) -> Self {
        Self::new(ResultStatus::Success, output)
    }

    pub fn awaiting(output: R) -> Self {
        Self::new(ResultStatus::Await, output)
    }

    pub fn failed(output: R) -> Self {
        Self::new(ResultStatus::Failed, output)
    }

    pub fn error(output: R) -> Self {
        Self::new(ResultStatus::Error, output)
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    pub fn is_await(&self) -> bool {
        self.status == ResultStatus::Await
    }

    /// Transform the output while keeping the status.
    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> OperationResult<T> {
        OperationResult { status: self.status, output: f(self.output) }
    }
}
