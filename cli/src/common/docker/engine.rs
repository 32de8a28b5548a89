//! # Engine API Seam
//!
//! File: cli/src/common/docker/engine.rs
//!
//! ## Overview
//!
//! `EngineApi` is the read-only slice of the Docker Engine API the compose
//! client uses: four list calls, each taking Docker API filters. The
//! production implementation is `bollard::Docker`; tests substitute an
//! in-memory engine.
//!
//! Filters use the Engine API's own shape: filter name (`"label"`, `"name"`,
//! ...) mapped to the accepted values.
//!
use crate::core::error::{ComposeError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use bollard::{
    container::ListContainersOptions,
    image::ListImagesOptions,
    models::{ContainerSummary, ImageSummary, Network, Volume},
    network::ListNetworksOptions,
    volume::ListVolumesOptions,
    Docker,
};
use std::collections::HashMap;
use tracing::{debug, error, instrument};

/// Engine API filters: filter name to accepted values.
pub type Filters = HashMap<String, Vec<String>>;

/// Read-only Engine API operations used for compose project listings.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Lists containers; `all` includes stopped ones.
    async fn list_containers(&self, all: bool, filters: Filters) -> Result<Vec<ContainerSummary>>;

    async fn list_networks(&self, filters: Filters) -> Result<Vec<Network>>;

    async fn list_volumes(&self, filters: Filters) -> Result<Vec<Volume>>;

    async fn list_images(&self, filters: Filters) -> Result<Vec<ImageSummary>>;
}

fn api_error(what: &str, source: bollard::errors::Error) -> anyhow::Error {
    error!("Failed to list {}: {:?}", what, source);
    anyhow!(ComposeError::DockerApi { source }).context(format!("Failed to list {}", what))
}

#[async_trait]
impl EngineApi for Docker {
    #[instrument(skip(self))]
    async fn list_containers(&self, all: bool, filters: Filters) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions {
            all,
            filters,
            ..Default::default()
        };
        let containers = Docker::list_containers(self, Some(options))
            .await
            .map_err(|e| api_error("containers", e))?;
        debug!("Engine returned {} container(s)", containers.len());
        Ok(containers)
    }

    #[instrument(skip(self))]
    async fn list_networks(&self, filters: Filters) -> Result<Vec<Network>> {
        Docker::list_networks(self, Some(ListNetworksOptions { filters }))
            .await
            .map_err(|e| api_error("networks", e))
    }

    #[instrument(skip(self))]
    async fn list_volumes(&self, filters: Filters) -> Result<Vec<Volume>> {
        let response = Docker::list_volumes(self, Some(ListVolumesOptions { filters }))
            .await
            .map_err(|e| api_error("volumes", e))?;
        Ok(response.volumes.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list_images(&self, filters: Filters) -> Result<Vec<ImageSummary>> {
        let options = ListImagesOptions {
            filters,
            ..Default::default()
        };
        Docker::list_images(self, Some(options))
            .await
            .map_err(|e| api_error("images", e))
    }
}
