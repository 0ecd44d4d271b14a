// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fop-core: data model and task sequencing for the Flink cluster operator

pub mod macros;

pub mod annotations;
pub mod clock;
pub mod cluster;
pub mod crd;
pub mod digest;
pub mod result;
pub mod savepoint;
pub mod status;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use annotations::{ManualAction, ManualActionAnnotation, UnknownManualAction};
pub use clock::{Clock, FakeClock, SystemClock};
pub use cluster::ClusterId;
pub use crd::{
    BootstrapSpec, FlinkCluster, FlinkClusterSpec, FlinkClusterStatus, JobManagerSpec,
    OperatorSpec, RuntimeSpec, SavepointMode, TaskManagerSpec,
};
#[cfg(any(test, feature = "test-support"))]
pub use crd::FlinkClusterSpecBuilder;
pub use digest::Digests;
pub use result::{OperationResult, ResultStatus};
pub use savepoint::{SavepointOptions, SavepointRequest};
pub use task::{ClusterStatus, ClusterTask, TaskStatus};
