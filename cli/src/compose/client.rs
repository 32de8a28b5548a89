//! # Compose Client Facade
//!
//! File: cli/src/compose/client.rs
//!
//! ## Overview
//!
//! `ComposeClient` is bound to one project directory. It runs every mutating
//! operation as a `docker compose` subprocess and answers listing questions
//! through the Engine API (see `listing.rs`).
//!
//! ## Architecture
//!
//! - **Construction** (`connect` / `with_engine`) checks, in order: the compose
//!   binary resolves, `docker-compose.yml` is readable in the directory, an
//!   Engine API handle can be built. Any failure means no client.
//! - **Dispatch** (`dispatch`) is the one routine behind every subcommand
//!   method. In `ExecMode::Piped` it returns `Dispatch::Streaming(Pipes)` as
//!   soon as the process starts and hands the child to the tracker; in
//!   `ExecMode::Direct` it waits for exit and returns `Dispatch::Completed`.
//! - **Cancellation**: once the construction-time `CancellationToken` is
//!   cancelled, no new subprocess is created. Running ones are left alone.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let settings = ClientSettings::default();
//! let client = ComposeClient::connect("./my-app", &settings, CancellationToken::new())?;
//! let mut pipes = client.up().await?.into_pipes().expect("piped mode");
//! println!("{}", pipes.output_string().await);
//! client.wait().await;
//! ```
//!
use super::command::{ComposeCommand, ServiceAction};
use super::names::sanitize;
use crate::{
    common::{
        docker::{connect_docker, EngineApi},
        process::{self, Invocation, Pipes, ProcessTracker, WaitReport},
        system::resolve_tool,
    },
    core::{
        config::{ClientSettings, ExecMode},
        error::{ComposeError, Result},
    },
};
use anyhow::{anyhow, Context};
use bollard::Docker;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Compose definition file required in the project directory.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Outcome of a dispatched subcommand.
#[derive(Debug)]
pub enum Dispatch {
    /// Piped mode: the process is running and its streams belong to the caller.
    Streaming(Pipes),
    /// Direct mode: the process has exited successfully.
    Completed,
}

impl Dispatch {
    pub fn into_pipes(self) -> Option<Pipes> {
        match self {
            Dispatch::Streaming(pipes) => Some(pipes),
            Dispatch::Completed => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Dispatch::Completed)
    }
}

/// A docker compose client bound to one project directory.
#[derive(Debug)]
pub struct ComposeClient<E = Docker> {
    binary: PathBuf,
    project_dir: PathBuf,
    project_name: String,
    mode: ExecMode,
    tracker: ProcessTracker,
    cancel: CancellationToken,
    pub(super) engine: E,
}

impl ComposeClient<Docker> {
    /// Builds a client for `project_dir`, connecting to the Engine API from
    /// the ambient environment.
    ///
    /// # Errors
    ///
    /// * `ComposeError::ToolNotFound` - `settings.binary` does not resolve.
    /// * `ComposeError::ProjectNotFound` - no readable `docker-compose.yml`.
    /// * `ComposeError::EngineUnavailable` - no Engine API handle.
    pub fn connect(
        project_dir: impl AsRef<Path>,
        settings: &ClientSettings,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let project = Project::locate(project_dir.as_ref(), settings)?;
        let engine = connect_docker()?;
        Ok(Self::assemble(project, settings.mode, cancel, engine))
    }
}

impl<E: EngineApi> ComposeClient<E> {
    /// Same checks as `connect`, but with a caller-supplied Engine API client.
    pub fn with_engine(
        project_dir: impl AsRef<Path>,
        settings: &ClientSettings,
        cancel: CancellationToken,
        engine: E,
    ) -> Result<Self> {
        let project = Project::locate(project_dir.as_ref(), settings)?;
        Ok(Self::assemble(project, settings.mode, cancel, engine))
    }

    fn assemble(project: Project, mode: ExecMode, cancel: CancellationToken, engine: E) -> Self {
        info!(
            "Compose client ready for project '{}' at {} ({:?} mode)",
            project.name,
            project.dir.display(),
            mode
        );
        Self {
            binary: project.binary,
            project_dir: project.dir,
            project_name: project.name,
            mode,
            tracker: ProcessTracker::new(),
            cancel,
            engine,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Sanitized basename of the project directory.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ExecMode) {
        debug!("Switching execution mode to {:?}", mode);
        self.mode = mode;
    }

    pub fn tracker(&self) -> &ProcessTracker {
        &self.tracker
    }

    /// Waits for every piped subprocess launched so far to exit.
    pub async fn wait(&self) -> WaitReport {
        self.tracker.wait().await
    }

    /// The exact command line `dispatch` would run for `command`.
    pub fn invocation(&self, command: &ComposeCommand) -> Invocation {
        Invocation::new(&self.binary, command.to_args(), &self.project_dir)
    }

    /// Runs `command` in the client's current execution mode.
    ///
    /// # Errors
    ///
    /// * `ComposeError::Cancelled` - the client's token was cancelled.
    /// * `ComposeError::Launch` - the subprocess could not be started.
    /// * `ComposeError::CommandFailed` - direct mode only, non-zero exit.
    #[instrument(skip(self), fields(project = %self.project_name))]
    pub async fn dispatch(&self, command: &ComposeCommand) -> Result<Dispatch> {
        let invocation = self.invocation(command);
        if self.cancel.is_cancelled() {
            warn!("Not launching '{}': context cancelled", invocation);
            return Err(anyhow!(ComposeError::Cancelled {
                command: invocation.to_string(),
            }));
        }
        match self.mode {
            ExecMode::Piped => {
                process::launch_piped(&invocation, &self.tracker).map(Dispatch::Streaming)
            }
            ExecMode::Direct => process::run_direct(&invocation)
                .await
                .map(|()| Dispatch::Completed),
        }
    }

    async fn service_action(
        &self,
        action: ServiceAction,
        service: Option<&str>,
    ) -> Result<Dispatch> {
        let command = ComposeCommand::Service {
            action,
            service: service.map(str::to_string),
        };
        self.dispatch(&command).await
    }

    /// `compose up -d`: create and start containers.
    pub async fn up(&self) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Up).await
    }

    /// `compose down`: stop and remove containers and networks.
    pub async fn down(&self) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Down).await
    }

    /// `compose config`: the compose file in canonical form.
    pub async fn config(&self) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Config).await
    }

    pub async fn build(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Build, Some(service)).await
    }

    pub async fn build_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Build, None).await
    }

    pub async fn create(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Create, Some(service)).await
    }

    pub async fn create_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Create, None).await
    }

    pub async fn start(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Start, Some(service)).await
    }

    pub async fn start_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Start, None).await
    }

    pub async fn stop(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Stop, Some(service)).await
    }

    pub async fn stop_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Stop, None).await
    }

    pub async fn restart(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Restart, Some(service)).await
    }

    pub async fn restart_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Restart, None).await
    }

    pub async fn kill(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Kill, Some(service)).await
    }

    pub async fn kill_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Kill, None).await
    }

    pub async fn pause(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Pause, Some(service)).await
    }

    pub async fn pause_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Pause, None).await
    }

    pub async fn unpause(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Unpause, Some(service)).await
    }

    pub async fn unpause_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Unpause, None).await
    }

    /// Removes stopped containers of `service`.
    pub async fn rm(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Rm, Some(service)).await
    }

    pub async fn rm_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Rm, None).await
    }

    pub async fn top(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Top, Some(service)).await
    }

    pub async fn top_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Top, None).await
    }

    pub async fn pull(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Pull, Some(service)).await
    }

    pub async fn pull_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Pull, None).await
    }

    pub async fn push(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Push, Some(service)).await
    }

    pub async fn push_all(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Push, None).await
    }

    /// Real-time container events for the whole project. Never exits on its
    /// own; read it in piped mode.
    pub async fn events(&self) -> Result<Dispatch> {
        self.service_action(ServiceAction::Events, None).await
    }

    pub async fn events_for(&self, service: &str) -> Result<Dispatch> {
        self.service_action(ServiceAction::Events, Some(service)).await
    }

    pub async fn logs(&self, service: &str) -> Result<Dispatch> {
        self.logs_with(Some(service), false).await
    }

    pub async fn logs_all(&self) -> Result<Dispatch> {
        self.logs_with(None, false).await
    }

    /// `compose logs --follow <service>`.
    pub async fn logs_stream(&self, service: &str) -> Result<Dispatch> {
        self.logs_with(Some(service), true).await
    }

    pub async fn logs_all_stream(&self) -> Result<Dispatch> {
        self.logs_with(None, true).await
    }

    async fn logs_with(&self, service: Option<&str>, follow: bool) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Logs {
            service: service.map(str::to_string),
            follow,
        })
        .await
    }

    /// Runs `command` inside the running container of `service`.
    /// Only the service name is sanitized.
    pub async fn exec<S: AsRef<str>>(&self, service: &str, command: &[S]) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Exec {
            service: service.to_string(),
            command: command.iter().map(|s| s.as_ref().to_string()).collect(),
        })
        .await
    }

    /// Runs a one-off `command` in a fresh container of `service`, removed on exit.
    pub async fn run<S: AsRef<str>>(&self, service: &str, command: &[S]) -> Result<Dispatch> {
        self.dispatch(&ComposeCommand::Run {
            service: service.to_string(),
            command: command.iter().map(|s| s.as_ref().to_string()).collect(),
        })
        .await
    }
}

/// Results of the construction-time checks.
struct Project {
    binary: PathBuf,
    dir: PathBuf,
    name: String,
}

impl Project {
    fn locate(project_dir: &Path, settings: &ClientSettings) -> Result<Self> {
        let binary = resolve_tool(&settings.binary)?;
        let compose_file = project_dir.join(COMPOSE_FILE);
        check_readable(&compose_file).map_err(|source| {
            warn!("Compose file check failed for {}: {}", compose_file.display(), source);
            anyhow!(ComposeError::ProjectNotFound {
                path: compose_file.clone(),
                source,
            })
        })?;

        let dir = project_dir.canonicalize().with_context(|| {
            format!("Failed to resolve project directory {}", project_dir.display())
        })?;
        // The directory as given names the project, even through a symlink;
        // `.`, `..` and `/` fall back to the resolved path.
        let basename = project_dir
            .file_name()
            .or_else(|| dir.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = sanitize(&basename);
        if name.is_empty() {
            warn!(
                "Project directory basename '{}' sanitizes to an empty project name",
                basename
            );
        }
        debug!("Derived project name '{}' from '{}'", name, basename);

        Ok(Self { binary, dir, name })
    }
}

fn check_readable(path: &Path) -> io::Result<()> {
    let file = File::open(path)?;
    if file.metadata()?.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"))
    }
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::compose::testing::{project_dir, settings, FakeEngine};
    use crate::core::error::is_compose_error;
    use std::fs;
    use tempfile::tempdir;

    fn client_in(dir: &Path, binary: &str) -> ComposeClient<FakeEngine> {
        ComposeClient::with_engine(
            dir,
            &settings(binary),
            CancellationToken::new(),
            FakeEngine::default(),
        )
        .expect("client should construct")
    }

    #[test]
    fn test_missing_compose_file_is_project_not_found() {
        let dir = tempdir().unwrap();
        let err = ComposeClient::with_engine(
            dir.path(),
            &settings("sh"),
            CancellationToken::new(),
            FakeEngine::default(),
        )
        .unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::ProjectNotFound { .. }
        )));
    }

    #[test]
    fn test_compose_file_that_is_a_directory_is_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(COMPOSE_FILE)).unwrap();
        let err = ComposeClient::with_engine(
            dir.path(),
            &settings("sh"),
            CancellationToken::new(),
            FakeEngine::default(),
        )
        .unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::ProjectNotFound { .. }
        )));
    }

    #[test]
    fn test_unresolvable_binary_is_checked_first() {
        // No compose file either, but the tool check runs before it.
        let dir = tempdir().unwrap();
        let err = ComposeClient::with_engine(
            dir.path(),
            &settings("composectl-missing-binary"),
            CancellationToken::new(),
            FakeEngine::default(),
        )
        .unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::ToolNotFound { .. }
        )));
    }

    #[test]
    fn test_project_name_is_sanitized_basename() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "My App!");
        let client = client_in(&dir, "sh");
        assert_eq!(client.project_name(), "MyApp");
        assert_eq!(client.mode(), ExecMode::Piped);
    }

    #[test]
    fn test_project_name_follows_given_path_not_symlink_target() {
        let root = tempdir().unwrap();
        let target = project_dir(root.path(), "real-target");
        let link = root.path().join("linked-app");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let client = client_in(&link, "sh");
        assert_eq!(client.project_name(), "linked-app");
    }

    #[test]
    fn test_project_name_for_parent_ref_uses_resolved_dir() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "outer");
        fs::create_dir(dir.join("sub")).unwrap();
        // `<dir>/sub/..` has no file name of its own.
        let client = client_in(&dir.join("sub").join(".."), "sh");
        assert_eq!(client.project_name(), "outer");
    }

    #[test]
    fn test_start_all_invocation() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");
        let client = client_in(&dir, "sh");

        let inv = client.invocation(&ComposeCommand::all(ServiceAction::Start));
        assert_eq!(inv.program, client.binary());
        assert_eq!(inv.args, ["compose", "start"]);
        assert_eq!(inv.current_dir(), dir.canonicalize().unwrap());
        assert_eq!(client.project_name(), "demo");
    }

    #[tokio::test]
    async fn test_start_single_service_spawns_sanitized_argv() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");
        // `echo` stands in for docker and prints the argv it was given.
        let client = client_in(&dir, "echo");

        let mut pipes = client.start("web!!").await.unwrap().into_pipes().unwrap();
        assert_eq!(pipes.output_string().await, "compose start web\n");
        pipes.close().await.unwrap();

        let report = client.wait().await;
        assert_eq!(report.completed, 1);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_exec_passes_payload_unsanitized() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");
        let client = client_in(&dir, "echo");

        let mut pipes = client
            .exec("api!", &["ls", "-la", "/srv/data dir"])
            .await
            .unwrap()
            .into_pipes()
            .unwrap();
        assert_eq!(
            pipes.stdout_string().await,
            "compose exec -T api ls -la /srv/data dir\n"
        );
        client.wait().await;
    }

    #[tokio::test]
    async fn test_direct_mode_blocks_and_reports_failure() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");

        let mut ok_client = client_in(&dir, "true");
        ok_client.set_mode(ExecMode::Direct);
        assert!(ok_client.up().await.unwrap().is_completed());
        assert_eq!(ok_client.tracker().outstanding(), 0);

        let mut failing = client_in(&dir, "false");
        failing.set_mode(ExecMode::Direct);
        let err = failing.kill_all().await.unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::CommandFailed { .. }
        )));
    }

    #[tokio::test]
    async fn test_piped_failure_surfaces_only_in_wait_report() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");
        let client = client_in(&dir, "false");

        assert!(client.down().await.is_ok());
        let report = client.wait().await;
        assert_eq!(report.completed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].command.ends_with("compose down"));
    }

    #[tokio::test]
    async fn test_cancelled_context_blocks_new_launches() {
        let root = tempdir().unwrap();
        let dir = project_dir(root.path(), "demo");
        let token = CancellationToken::new();
        let engine = FakeEngine::default();
        let client =
            ComposeClient::with_engine(&dir, &settings("echo"), token.clone(), engine).unwrap();

        token.cancel();
        let err = client.up().await.unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::Cancelled { .. }
        )));
        assert_eq!(client.tracker().outstanding(), 0);
    }
}
