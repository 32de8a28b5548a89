//! # Project-Scoped Listings
//!
//! File: cli/src/compose/listing.rs
//!
//! ## Overview
//!
//! Read-only views of a compose project through the Engine API. Every call
//! carries the filter `label=com.docker.compose.project=<project name>`, so
//! only resources compose created for this project come back.
//!
//! `port` is the one composed query: it lists running project containers,
//! keeps those labelled with the requested service, and flattens their port
//! descriptors in container order.
//!
use super::{client::ComposeClient, names::sanitize};
use crate::{
    common::docker::{EngineApi, Filters},
    core::error::Result,
};
use anyhow::Context;
use bollard::models::{ContainerSummary, ImageSummary, Network, Port, Volume};
use tracing::{debug, instrument};

/// Label compose puts on every resource of a project.
pub const PROJECT_LABEL: &str = "com.docker.compose.project";
/// Label compose puts on every container of a service.
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

/// `label=<key>=<value>` as an Engine API filter map.
pub fn label_filter(key: &str, value: &str) -> Filters {
    Filters::from([("label".to_string(), vec![format!("{}={}", key, value)])])
}

fn has_label(container: &ContainerSummary, key: &str, value: &str) -> bool {
    container
        .labels
        .as_ref()
        .and_then(|labels| labels.get(key))
        .is_some_and(|v| v == value)
}

impl<E: EngineApi> ComposeClient<E> {
    fn project_filters(&self) -> Filters {
        label_filter(PROJECT_LABEL, self.project_name())
    }

    /// Project containers; `include_stopped` adds exited and created ones.
    #[instrument(skip(self), fields(project = %self.project_name()))]
    pub async fn containers(&self, include_stopped: bool) -> Result<Vec<ContainerSummary>> {
        let containers = self
            .engine
            .list_containers(include_stopped, self.project_filters())
            .await
            .with_context(|| {
                format!("Failed to list containers of project '{}'", self.project_name())
            })?;
        debug!("Project has {} container(s)", containers.len());
        Ok(containers)
    }

    /// Running project containers.
    pub async fn ps(&self) -> Result<Vec<ContainerSummary>> {
        self.containers(false).await
    }

    /// All project containers, stopped ones included.
    pub async fn ps_all(&self) -> Result<Vec<ContainerSummary>> {
        self.containers(true).await
    }

    #[instrument(skip(self), fields(project = %self.project_name()))]
    pub async fn networks(&self) -> Result<Vec<Network>> {
        self.engine
            .list_networks(self.project_filters())
            .await
            .with_context(|| {
                format!("Failed to list networks of project '{}'", self.project_name())
            })
    }

    #[instrument(skip(self), fields(project = %self.project_name()))]
    pub async fn volumes(&self) -> Result<Vec<Volume>> {
        self.engine
            .list_volumes(self.project_filters())
            .await
            .with_context(|| {
                format!("Failed to list volumes of project '{}'", self.project_name())
            })
    }

    #[instrument(skip(self), fields(project = %self.project_name()))]
    pub async fn images(&self) -> Result<Vec<ImageSummary>> {
        self.engine
            .list_images(self.project_filters())
            .await
            .with_context(|| {
                format!("Failed to list images of project '{}'", self.project_name())
            })
    }

    /// Port descriptors of every running container of `service`.
    ///
    /// Empty when the service has no running containers.
    #[instrument(skip(self), fields(project = %self.project_name()))]
    pub async fn port(&self, service: &str) -> Result<Vec<Port>> {
        let service = sanitize(service);
        let ports: Vec<Port> = self
            .containers(false)
            .await?
            .into_iter()
            .filter(|c| has_label(c, SERVICE_LABEL, &service))
            .flat_map(|c| c.ports.unwrap_or_default())
            .collect();
        debug!("Service '{}' exposes {} port descriptor(s)", service, ports.len());
        Ok(ports)
    }

    /// First host port published for `private_port` of `service`, if any.
    pub async fn published_port(&self, service: &str, private_port: u16) -> Result<Option<u16>> {
        Ok(self
            .port(service)
            .await?
            .into_iter()
            .filter(|p| p.private_port == private_port)
            .find_map(|p| p.public_port))
    }
}
