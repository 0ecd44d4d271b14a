// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use k8s_openapi::api::core::v1::{ServicePort, ServiceSpec};

fn id() -> ClusterId {
    ClusterId::new("flink", "test")
}

fn service(cluster_ip: Option<&str>, ports: Vec<ServicePort>) -> Service {
    Service {
        spec: Some(ServiceSpec {
            cluster_ip: cluster_ip.map(str::to_string),
            ports: Some(ports),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn port(name: &str, port: i32, node_port: Option<i32>) -> ServicePort {
    ServicePort { name: Some(name.to_string()), port, node_port, ..Default::default() }
}

#[test]
fn uses_cluster_ip_and_rest_port() {
    let svc = service(Some("10.0.0.7"), vec![port("rpc", 6123, None), port("ui", 8081, None)]);
    let address = service_address(&id(), &svc, &FlinkOptions::default()).unwrap();
    assert_eq!(address, FlinkAddress::new("10.0.0.7", 8081));
}

#[test]
fn falls_back_to_first_port() {
    let svc = service(Some("10.0.0.7"), vec![port("http", 9000, None)]);
    let address = service_address(&id(), &svc, &FlinkOptions::default()).unwrap();
    assert_eq!(address.port, 9000);
}

#[test]
fn hostname_overrides_cluster_ip() {
    let svc = service(Some("10.0.0.7"), vec![port("ui", 8081, None)]);
    let options = FlinkOptions { hostname: Some("flink.local".to_string()), ..Default::default() };
    let address = service_address(&id(), &svc, &options).unwrap();
    assert_eq!(address, FlinkAddress::new("flink.local", 8081));
}

#[test]
fn node_port_mode_uses_node_port() {
    let svc = service(Some("10.0.0.7"), vec![port("ui", 8081, Some(30081))]);
    let options = FlinkOptions {
        hostname: Some("192.168.99.100".to_string()),
        use_node_port: true,
        ..Default::default()
    };
    let address = service_address(&id(), &svc, &options).unwrap();
    assert_eq!(address, FlinkAddress::new("192.168.99.100", 30081));
}

#[test]
fn node_port_mode_without_node_port_fails() {
    let svc = service(Some("10.0.0.7"), vec![port("ui", 8081, None)]);
    let options = FlinkOptions { use_node_port: true, ..Default::default() };
    let err = service_address(&id(), &svc, &options).unwrap_err();
    assert!(matches!(err, KubeClientError::AddressNotFound(_)));
}

#[test]
fn port_forward_ignores_service() {
    let options = FlinkOptions { port_forward: Some(34000), ..Default::default() };
    let address = service_address(&id(), &Service::default(), &options).unwrap();
    assert_eq!(address, FlinkAddress::new("localhost", 34000));
}

#[yare::parameterized(
    missing  = { None },
    empty    = { Some("") },
    headless = { Some("None") },
)]
fn service_without_cluster_ip_has_no_address(cluster_ip: Option<&str>) {
    let svc = service(cluster_ip, vec![port("ui", 8081, None)]);
    let err = service_address(&id(), &svc, &FlinkOptions::default()).unwrap_err();
    assert!(matches!(err, KubeClientError::AddressNotFound(_)));
}

#[test]
fn service_without_ports_has_no_address() {
    let svc = service(Some("10.0.0.7"), vec![]);
    let err = service_address(&id(), &svc, &FlinkOptions::default()).unwrap_err();
    assert!(matches!(err, KubeClientError::AddressNotFound(_)));
}

#[test]
fn names_follow_cluster_name() {
    assert_eq!(job_manager_service_name("test"), "flink-jobmanager-test");
    assert_eq!(cluster_selector("test"), "component=flink,name=test");
}
