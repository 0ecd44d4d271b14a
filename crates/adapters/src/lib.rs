// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the two systems the operator talks to: the Flink REST API of
//! each managed cluster and the Kubernetes API server.

pub mod flink;
pub mod platform;

pub use flink::{
    FlinkAddress, FlinkClient, FlinkClientError, HttpFlinkClient, JobSubmission, SavepointStatus,
    SavepointTriggered, DEFAULT_REST_TIMEOUT,
};
pub use platform::{FlinkOptions, KubeClient, KubeClientError, KubeClusterClient};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use flink::{FakeFlinkClient, FlinkCall, FlinkOp};
#[cfg(any(test, feature = "test-support"))]
pub use platform::{FakeKubeClient, KubeCall, KubeOp};
