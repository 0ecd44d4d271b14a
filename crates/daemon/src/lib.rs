// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fop-daemon: process bootstrap and the tick loop of the Flink operator

pub mod env;
pub mod lifecycle;

pub use env::{ConfigError, Settings};
pub use lifecycle::{Daemon, LifecycleError};
