// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::a_flink_cluster;

#[test]
fn display_is_namespace_slash_name() {
    assert_eq!(ClusterId::new("flink", "test").to_string(), "flink/test");
}

#[test]
fn of_reads_resource_metadata() {
    let cluster = a_flink_cluster("test", "flink");
    assert_eq!(ClusterId::of(&cluster), ClusterId::new("flink", "test"));
}

#[test]
fn of_defaults_missing_namespace() {
    let mut cluster = a_flink_cluster("test", "flink");
    cluster.metadata.namespace = None;
    assert_eq!(ClusterId::of(&cluster).namespace, "default");
}

#[test]
fn ids_order_by_namespace_then_name() {
    let mut ids = vec![
        ClusterId::new("b", "a"),
        ClusterId::new("a", "z"),
        ClusterId::new("a", "b"),
    ];
    ids.sort();
    assert_eq!(
        ids,
        vec![ClusterId::new("a", "b"), ClusterId::new("a", "z"), ClusterId::new("b", "a")]
    );
}
