// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

use fop_adapters::{FlinkOptions, DEFAULT_REST_TIMEOUT};
use fop_engine::OperatorConfig;
use thiserror::Error;

/// Default log filter when `FOP_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}: expected {expected}, got {value:?}")]
    Invalid { name: &'static str, expected: &'static str, value: String },
}

/// Everything the daemon reads from its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub operator: OperatorConfig,
    pub flink: FlinkOptions,
    pub rest_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; unset and empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut operator = OperatorConfig::default();
        if let Some(namespace) = var("FOP_NAMESPACE") {
            operator = operator.namespace(namespace);
        }
        if let Some(ms) = parse::<u64>(&var, "FOP_TICK_INTERVAL_MS", "milliseconds")? {
            if ms == 0 {
                return Err(invalid("FOP_TICK_INTERVAL_MS", "milliseconds", "0"));
            }
            operator = operator.tick_interval(Duration::from_millis(ms));
        }
        if let Some(attempts) = parse::<u32>(&var, "FOP_MAX_TASK_ATTEMPTS", "a count")? {
            operator = operator.max_task_attempts(attempts);
        }

        let flink = FlinkOptions {
            hostname: var("FOP_FLINK_HOSTNAME"),
            port_forward: parse::<u16>(&var, "FOP_FLINK_PORT_FORWARD", "a port")?,
            use_node_port: parse_bool(&var, "FOP_USE_NODE_PORT")?.unwrap_or(false),
        };

        let rest_timeout = parse::<u64>(&var, "FOP_REST_TIMEOUT_MS", "milliseconds")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REST_TIMEOUT);

        Ok(Self { operator, flink, rest_timeout })
    }
}

/// Log filter directives (`FOP_LOG`, default `info`)
pub fn log_filter() -> String {
    std::env::var("FOP_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn parse<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| value.trim().parse::<T>().map_err(|_| invalid(name, expected, &value)))
        .transpose()
}

fn parse_bool(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<bool>, ConfigError> {
    var(name)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(invalid(name, "a boolean", &value)),
        })
        .transpose()
}

fn invalid(name: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid { name, expected, value: value.to_string() }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
