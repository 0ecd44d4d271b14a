// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`KubeClient`] backed by kube-rs.

use super::{
    cluster_selector, job_manager_service_name, FlinkOptions, KubeClient, KubeClientError,
};
use crate::flink::FlinkAddress;
use async_trait::async_trait;
use fop_core::{ClusterId, FlinkCluster};
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;

/// Name of the service port serving the REST API
const REST_PORT_NAME: &str = "ui";

#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
    options: FlinkOptions,
}

impl KubeClusterClient {
    pub async fn new(options: FlinkOptions) -> Result<Self, KubeClientError> {
        let client = Client::try_default()
            .await
            .map_err(|e| KubeClientError::Api(format!("failed to create kube client: {}", e)))?;
        Ok(Self { client, options })
    }

    pub fn from_client(client: Client, options: FlinkOptions) -> Self {
        Self { client, options }
    }

    fn clusters(&self, namespace: &str) -> Api<FlinkCluster> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn map_kube_error(err: kube::Error, what: &str) -> KubeClientError {
    match err {
        kube::Error::Api(ref response) if response.code == 404 => {
            KubeClientError::NotFound(what.to_string())
        }
        kube::Error::Api(ref response) if response.code == 409 => {
            KubeClientError::Conflict(format!("{}: {}", what, response.message))
        }
        other => KubeClientError::Api(format!("{}: {}", what, other)),
    }
}

/// Work out where the REST endpoint of a job manager service is reachable.
pub(super) fn service_address(
    id: &ClusterId,
    service: &Service,
    options: &FlinkOptions,
) -> Result<FlinkAddress, KubeClientError> {
    let not_found = |reason: &str| KubeClientError::AddressNotFound(format!("{} ({})", id, reason));

    if let Some(port) = options.port_forward {
        let host = options.hostname.clone().unwrap_or_else(|| "localhost".to_string());
        return Ok(FlinkAddress::new(host, port));
    }

    let spec = service.spec.as_ref().ok_or_else(|| not_found("service has no spec"))?;
    let ports = spec.ports.as_deref().unwrap_or_default();
    let port = ports
        .iter()
        .find(|p| p.name.as_deref() == Some(REST_PORT_NAME))
        .or_else(|| ports.first())
        .ok_or_else(|| not_found("service exposes no ports"))?;

    if options.use_node_port {
        let node_port = port.node_port.ok_or_else(|| not_found("service has no node port"))?;
        let node_port =
            u16::try_from(node_port).map_err(|_| not_found("node port out of range"))?;
        let host = options.hostname.clone().unwrap_or_else(|| "localhost".to_string());
        return Ok(FlinkAddress::new(host, node_port));
    }

    let port = u16::try_from(port.port).map_err(|_| not_found("port out of range"))?;
    let host = match &options.hostname {
        Some(hostname) => hostname.clone(),
        None => spec
            .cluster_ip
            .clone()
            .filter(|ip| !ip.is_empty() && ip != "None")
            .ok_or_else(|| not_found("service has no cluster IP"))?,
    };
    Ok(FlinkAddress::new(host, port))
}

#[async_trait]
impl KubeClient for KubeClusterClient {
    async fn resolve_cluster_address(
        &self,
        id: &ClusterId,
    ) -> Result<FlinkAddress, KubeClientError> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), &id.namespace);
        let service_name = job_manager_service_name(&id.name);
        let service = services.get(&service_name).await.map_err(|e| match e {
            kube::Error::Api(ref response) if response.code == 404 => {
                KubeClientError::AddressNotFound(format!("{} (no service {})", id, service_name))
            }
            other => map_kube_error(other, &service_name),
        })?;
        service_address(id, &service, &self.options)
    }

    async fn get_cluster(&self, id: &ClusterId) -> Result<FlinkCluster, KubeClientError> {
        self.clusters(&id.namespace)
            .get(&id.name)
            .await
            .map_err(|e| map_kube_error(e, &id.to_string()))
    }

    async fn list_clusters(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<FlinkCluster>, KubeClientError> {
        let api: Api<FlinkCluster> = match namespace {
            Some(namespace) => self.clusters(namespace),
            None => Api::all(self.client.clone()),
        };
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, "flinkclusters"))?;
        Ok(list.items)
    }

    async fn update_annotations(
        &self,
        id: &ClusterId,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), KubeClientError> {
        let patch = serde_json::json!({
            "metadata": { "annotations": annotations }
        });
        self.clusters(&id.namespace)
            .patch(&id.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_kube_error(e, &id.to_string()))?;
        tracing::debug!(cluster = %id, "annotations updated");
        Ok(())
    }

    async fn update_status(&self, cluster: &FlinkCluster) -> Result<FlinkCluster, KubeClientError> {
        let id = ClusterId::of(cluster);
        if cluster.resource_version().is_none() {
            return Err(KubeClientError::Conflict(format!("{} has no resource version", id)));
        }
        let data =
            serde_json::to_vec(cluster).map_err(|e| KubeClientError::Serialize(e.to_string()))?;
        let updated = self
            .clusters(&id.namespace)
            .replace_status(&id.name, &PostParams::default(), data)
            .await
            .map_err(|e| map_kube_error(e, &id.to_string()))?;
        tracing::debug!(
            cluster = %id,
            resource_version = updated.resource_version().as_deref().unwrap_or(""),
            "status updated"
        );
        Ok(updated)
    }

    async fn delete_cluster_resources(&self, id: &ClusterId) -> Result<(), KubeClientError> {
        let selector = cluster_selector(&id.name);
        let lp = ListParams::default().labels(&selector);
        let dp = DeleteParams::default();

        let statefulsets: Api<StatefulSet> = Api::namespaced(self.client.clone(), &id.namespace);
        statefulsets
            .delete_collection(&dp, &lp)
            .await
            .map_err(|e| map_kube_error(e, "statefulsets"))?;

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &id.namespace);
        pods.delete_collection(&dp, &lp).await.map_err(|e| map_kube_error(e, "pods"))?;

        // Services do not support deletecollection
        let services: Api<Service> = Api::namespaced(self.client.clone(), &id.namespace);
        let list = services.list(&lp).await.map_err(|e| map_kube_error(e, "services"))?;
        for service in list {
            let name = service.name_any();
            match services.delete(&name, &dp).await {
                Ok(_) => tracing::info!(cluster = %id, service = %name, "deleted service"),
                Err(kube::Error::Api(ref response)) if response.code == 404 => {}
                Err(e) => return Err(map_kube_error(e, &name)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "k8s_tests.rs"]
mod tests;
