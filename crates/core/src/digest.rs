// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content digests of the spec sections that require a restart when changed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::crd::FlinkClusterSpec;

/// Hex SHA-256 of each restart-relevant spec section.
///
/// An empty digest means "never recorded".
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Digests {
    #[serde(default)]
    pub job_manager: String,
    #[serde(default)]
    pub task_manager: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub bootstrap: String,
}

impl Digests {
    /// Compute digests of the given spec.
    pub fn of(spec: &FlinkClusterSpec) -> Self {
        Self {
            job_manager: digest_of(&spec.job_manager),
            task_manager: digest_of(&spec.task_manager),
            runtime: digest_of(&spec.runtime),
            bootstrap: digest_of(&spec.bootstrap),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.job_manager.is_empty()
            && self.task_manager.is_empty()
            && self.runtime.is_empty()
            && self.bootstrap.is_empty()
    }

    /// Names of the sections whose digest differs from `other`.
    pub fn changed_sections(&self, other: &Digests) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.job_manager != other.job_manager {
            changed.push("jobManager");
        }
        if self.task_manager != other.task_manager {
            changed.push("taskManager");
        }
        if self.runtime != other.runtime {
            changed.push("runtime");
        }
        if self.bootstrap != other.bootstrap {
            changed.push("bootstrap");
        }
        changed
    }
}

fn digest_of<T: Serialize>(section: &T) -> String {
    // Field order comes from the struct definition, so equal sections hash equal
    let canonical = serde_json::to_string(section).unwrap_or_default();
    let hash = Sha256::digest(canonical.as_bytes());
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
