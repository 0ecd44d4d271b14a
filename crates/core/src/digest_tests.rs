// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::crd::{RuntimeSpec, TaskManagerSpec};

#[test]
fn digests_are_hex_sha256() {
    let digests = Digests::of(&FlinkClusterSpec::builder().build());
    assert_eq!(digests.runtime.len(), 64);
    assert!(digests.runtime.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!digests.is_empty());
}

#[test]
fn equal_specs_have_equal_digests() {
    let a = Digests::of(&FlinkClusterSpec::builder().build());
    let b = Digests::of(&FlinkClusterSpec::builder().build());
    assert_eq!(a, b);
    assert!(a.changed_sections(&b).is_empty());
}

#[test]
fn runtime_change_is_detected() {
    let before = Digests::of(&FlinkClusterSpec::builder().build());
    let after = Digests::of(
        &FlinkClusterSpec::builder()
            .runtime(RuntimeSpec { image: "flink:1.10".to_string(), pull_policy: None })
            .build(),
    );
    assert_eq!(after.changed_sections(&before), vec!["runtime"]);
}

#[test]
fn task_manager_count_is_not_part_of_any_digest() {
    let before = Digests::of(&FlinkClusterSpec::builder().task_managers(1).build());
    let after = Digests::of(&FlinkClusterSpec::builder().task_managers(4).build());
    assert_eq!(before, after);
}

#[test]
fn task_slot_change_is_detected() {
    let before = Digests::of(&FlinkClusterSpec::builder().build());
    let after = Digests::of(
        &FlinkClusterSpec::builder()
            .task_manager(TaskManagerSpec { task_slots: 2, ..Default::default() })
            .build(),
    );
    assert_eq!(after.changed_sections(&before), vec!["taskManager"]);
}

#[test]
fn default_digests_are_empty() {
    assert!(Digests::default().is_empty());
}
