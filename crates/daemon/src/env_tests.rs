// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let vars: HashMap<String, String> =
        vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn defaults_when_unset() {
    let settings = settings(&[]).unwrap();

    assert_eq!(settings.operator, OperatorConfig::default());
    assert_eq!(settings.flink, FlinkOptions::default());
    assert_eq!(settings.rest_timeout, DEFAULT_REST_TIMEOUT);
}

#[test]
fn reads_every_variable() {
    let settings = settings(&[
        ("FOP_NAMESPACE", "flink"),
        ("FOP_TICK_INTERVAL_MS", "1000"),
        ("FOP_MAX_TASK_ATTEMPTS", "5"),
        ("FOP_FLINK_HOSTNAME", "localhost"),
        ("FOP_FLINK_PORT_FORWARD", "34000"),
        ("FOP_USE_NODE_PORT", "true"),
        ("FOP_REST_TIMEOUT_MS", "2500"),
    ])
    .unwrap();

    assert_eq!(settings.operator.namespace.as_deref(), Some("flink"));
    assert_eq!(settings.operator.tick_interval, Duration::from_secs(1));
    assert_eq!(settings.operator.max_task_attempts, 5);
    assert_eq!(
        settings.flink,
        FlinkOptions {
            hostname: Some("localhost".to_string()),
            port_forward: Some(34000),
            use_node_port: true,
        }
    );
    assert_eq!(settings.rest_timeout, Duration::from_millis(2500));
}

#[test]
fn empty_values_take_defaults() {
    let settings = settings(&[("FOP_NAMESPACE", ""), ("FOP_TICK_INTERVAL_MS", "  ")]).unwrap();

    assert_eq!(settings.operator.namespace, None);
    assert_eq!(settings.operator.tick_interval, OperatorConfig::default().tick_interval);
}

#[yare::parameterized(
    tick_interval = { "FOP_TICK_INTERVAL_MS", "soon" },
    zero_interval = { "FOP_TICK_INTERVAL_MS", "0" },
    attempts      = { "FOP_MAX_TASK_ATTEMPTS", "-1" },
    port_range    = { "FOP_FLINK_PORT_FORWARD", "70000" },
    node_port     = { "FOP_USE_NODE_PORT", "maybe" },
    rest_timeout  = { "FOP_REST_TIMEOUT_MS", "20s" },
)]
fn invalid_value_is_rejected(name: &str, value: &str) {
    let err = settings(&[(name, value)]).unwrap_err();

    let ConfigError::Invalid { name: reported, value: reported_value, .. } = err;
    assert_eq!(reported, name);
    assert_eq!(reported_value, value);
}

#[yare::parameterized(
    one   = { "1", true },
    yes   = { "YES", true },
    zero  = { "0", false },
    false_ = { "false", false },
)]
fn node_port_flag_spellings(value: &str, expected: bool) {
    let settings = settings(&[("FOP_USE_NODE_PORT", value)]).unwrap();
    assert_eq!(settings.flink.use_node_port, expected);
}
