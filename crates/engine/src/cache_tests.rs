// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fop_core::test_support::a_flink_cluster;
use fop_core::{ClusterStatus, FakeClock};

#[test]
fn insert_keys_by_namespace_and_name() {
    let cache = ClusterCache::new();
    let id = cache.insert(a_flink_cluster("test", "flink"));
    assert_eq!(id, ClusterId::new("flink", "test"));
    assert!(cache.get(&id).is_some());
    assert!(cache.get(&ClusterId::new("other", "test")).is_none());
}

#[test]
fn update_mutates_shared_snapshot() {
    let cache = ClusterCache::new();
    let id = cache.insert(a_flink_cluster("test", "flink"));
    let clone = cache.clone();

    let applied = clone.update(&id, |cluster| {
        cluster.status_mut().set_cluster_status(ClusterStatus::Running, &FakeClock::new());
    });

    assert!(applied.is_some());
    let status = cache.get(&id).unwrap().status.unwrap();
    assert_eq!(status.cluster_status(), ClusterStatus::Running);
}

#[test]
fn update_of_unknown_cluster_is_none() {
    let cache = ClusterCache::new();
    assert!(cache.update(&ClusterId::new("flink", "test"), |_| ()).is_none());
}

#[test]
fn retain_drops_deleted_clusters() {
    let cache = ClusterCache::new();
    let a = cache.insert(a_flink_cluster("a", "flink"));
    let b = cache.insert(a_flink_cluster("b", "flink"));

    cache.retain(std::slice::from_ref(&b));

    assert_eq!(cache.ids(), vec![b]);
    assert!(cache.remove(&a).is_none());
}
