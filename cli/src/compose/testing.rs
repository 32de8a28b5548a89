//! Test fixtures for the compose layer: project directories and an in-memory
//! Engine API that honours `label` filters.

use super::client::COMPOSE_FILE;
use super::listing::{PROJECT_LABEL, SERVICE_LABEL};
use crate::{
    common::docker::{EngineApi, Filters},
    core::{
        config::ClientSettings,
        error::{ComposeError, Result},
    },
};
use anyhow::anyhow;
use async_trait::async_trait;
use bollard::models::{ContainerSummary, ImageSummary, Network, Port, PortTypeEnum, Volume};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Creates `<root>/<name>/docker-compose.yml` and returns the project dir.
pub fn project_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(COMPOSE_FILE), "services: {}\n").unwrap();
    dir
}

pub fn settings(binary: &str) -> ClientSettings {
    ClientSettings {
        binary: binary.to_string(),
        ..Default::default()
    }
}

pub fn port(private_port: u16, public_port: Option<u16>) -> Port {
    Port {
        ip: public_port.map(|_| "0.0.0.0".to_string()),
        private_port,
        public_port,
        typ: Some(PortTypeEnum::TCP),
        ..Default::default()
    }
}

pub fn container(id: &str, project: &str, service: &str, ports: Vec<Port>) -> ContainerSummary {
    ContainerSummary {
        id: Some(id.to_string()),
        names: Some(vec![format!("/{}", id)]),
        labels: Some(HashMap::from([
            (PROJECT_LABEL.to_string(), project.to_string()),
            (SERVICE_LABEL.to_string(), service.to_string()),
        ])),
        ports: Some(ports),
        ..Default::default()
    }
}

/// In-memory engine. Containers are stored with a running flag; every call
/// is recorded with its filters.
#[derive(Debug, Default)]
pub struct FakeEngine {
    containers: Vec<(ContainerSummary, bool)>,
    fail: bool,
    calls: Mutex<Vec<(String, Filters)>>,
}

impl FakeEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: ContainerSummary, running: bool) -> Self {
        self.containers.push((container, running));
        self
    }

    pub fn calls(&self) -> Vec<(String, Filters)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, what: &str, filters: &Filters) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((what.to_string(), filters.clone()));
        if self.fail {
            return Err(anyhow!(ComposeError::DockerApi {
                source: bollard::errors::Error::DockerResponseServerError {
                    status_code: 500,
                    message: "engine unavailable".to_string(),
                },
            }));
        }
        Ok(())
    }
}

/// `true` if `labels` satisfies every `key=value` entry under `"label"`.
fn matches_labels(labels: Option<&HashMap<String, String>>, filters: &Filters) -> bool {
    filters.get("label").into_iter().flatten().all(|wanted| {
        let (key, value) = wanted.split_once('=').unwrap_or((wanted.as_str(), ""));
        labels
            .and_then(|l| l.get(key))
            .is_some_and(|v| value.is_empty() || v == value)
    })
}

#[async_trait]
impl EngineApi for FakeEngine {
    async fn list_containers(&self, all: bool, filters: Filters) -> Result<Vec<ContainerSummary>> {
        self.record("containers", &filters)?;
        Ok(self
            .containers
            .iter()
            .filter(|(_, running)| all || *running)
            .filter(|(c, _)| matches_labels(c.labels.as_ref(), &filters))
            .map(|(c, _)| c.clone())
            .collect())
    }

    async fn list_networks(&self, filters: Filters) -> Result<Vec<Network>> {
        self.record("networks", &filters)?;
        Ok(Vec::new())
    }

    async fn list_volumes(&self, filters: Filters) -> Result<Vec<Volume>> {
        self.record("volumes", &filters)?;
        Ok(Vec::new())
    }

    async fn list_images(&self, filters: Filters) -> Result<Vec<ImageSummary>> {
        self.record("images", &filters)?;
        Ok(Vec::new())
    }
}
