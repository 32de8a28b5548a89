//! # Compose Command Model
//!
//! File: cli/src/compose/command.rs
//!
//! ## Overview
//!
//! `ComposeCommand` enumerates every compose subcommand the client can run and
//! knows how to turn itself into the argument vector that follows the binary:
//! `compose <subcommand> [flags] [service] [command...]`.
//!
//! Service names are sanitized here, every time. Command payloads for `exec`
//! and `run` are passed through untouched.
//!
//! | Variant | Arguments |
//! |---|---|
//! | `Up` | `compose up -d` |
//! | `Down` | `compose down` |
//! | `Config` | `compose config` |
//! | `Service { action, service }` | `compose <action> [service]` |
//! | `Logs { service, follow }` | `compose logs [--follow] [service]` |
//! | `Exec { service, command }` | `compose exec -T <service> <command...>` |
//! | `Run { service, command }` | `compose run --rm -T <service> <command...>` |
//!
use super::names::sanitize;
use std::fmt;

/// Leading argument for every invocation.
pub const COMPOSE_ARG: &str = "compose";

/// Subcommands that take an optional single service target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceAction {
    Build,
    Create,
    Events,
    Kill,
    Pause,
    Pull,
    Push,
    Restart,
    Rm,
    Start,
    Stop,
    Top,
    Unpause,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Build => "build",
            ServiceAction::Create => "create",
            ServiceAction::Events => "events",
            ServiceAction::Kill => "kill",
            ServiceAction::Pause => "pause",
            ServiceAction::Pull => "pull",
            ServiceAction::Push => "push",
            ServiceAction::Restart => "restart",
            ServiceAction::Rm => "rm",
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Top => "top",
            ServiceAction::Unpause => "unpause",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compose subcommand with its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeCommand {
    /// Create and start containers, detached.
    Up,
    /// Stop and remove containers and networks created by `up`.
    Down,
    /// Render the canonical compose configuration.
    Config,
    /// A service-targeted action; `None` applies to every service.
    Service {
        action: ServiceAction,
        service: Option<String>,
    },
    /// Container logs; `follow` keeps streaming.
    Logs {
        service: Option<String>,
        follow: bool,
    },
    /// Run a command in a running service container.
    Exec {
        service: String,
        command: Vec<String>,
    },
    /// Run a one-off command in a new, auto-removed service container.
    Run {
        service: String,
        command: Vec<String>,
    },
}

impl ComposeCommand {
    pub fn all(action: ServiceAction) -> Self {
        ComposeCommand::Service {
            action,
            service: None,
        }
    }

    pub fn service(action: ServiceAction, service: impl Into<String>) -> Self {
        ComposeCommand::Service {
            action,
            service: Some(service.into()),
        }
    }

    /// The compose subcommand token.
    pub fn subcommand(&self) -> &'static str {
        match self {
            ComposeCommand::Up => "up",
            ComposeCommand::Down => "down",
            ComposeCommand::Config => "config",
            ComposeCommand::Service { action, .. } => action.as_str(),
            ComposeCommand::Logs { .. } => "logs",
            ComposeCommand::Exec { .. } => "exec",
            ComposeCommand::Run { .. } => "run",
        }
    }

    /// Full argument vector, starting with `compose`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![COMPOSE_ARG.to_string(), self.subcommand().to_string()];
        match self {
            ComposeCommand::Up => args.push("-d".into()),
            ComposeCommand::Down | ComposeCommand::Config => {}
            ComposeCommand::Service { service, .. } => {
                args.extend(service.as_deref().map(sanitize));
            }
            ComposeCommand::Logs { service, follow } => {
                if *follow {
                    args.push("--follow".into());
                }
                args.extend(service.as_deref().map(sanitize));
            }
            ComposeCommand::Exec { service, command } => {
                // Never a TTY: the client's streams are pipes or /dev/null.
                args.push("-T".into());
                args.push(sanitize(service));
                args.extend(command.iter().cloned());
            }
            ComposeCommand::Run { service, command } => {
                args.push("--rm".into());
                args.push("-T".into());
                args.push(sanitize(service));
                args.extend(command.iter().cloned());
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: ComposeCommand) -> Vec<String> {
        cmd.to_args()
    }

    #[test]
    fn test_fixed_flags() {
        assert_eq!(args(ComposeCommand::Up), ["compose", "up", "-d"]);
        assert_eq!(args(ComposeCommand::Down), ["compose", "down"]);
        assert_eq!(args(ComposeCommand::Config), ["compose", "config"]);
    }

    #[test]
    fn test_all_and_single_service() {
        assert_eq!(
            args(ComposeCommand::all(ServiceAction::Start)),
            ["compose", "start"]
        );
        assert_eq!(
            args(ComposeCommand::service(ServiceAction::Start, "web!!")),
            ["compose", "start", "web"]
        );
        assert_eq!(
            args(ComposeCommand::service(ServiceAction::Restart, "db main")),
            ["compose", "restart", "dbmain"]
        );
    }

    #[test]
    fn test_every_action_token() {
        let expected = [
            (ServiceAction::Build, "build"),
            (ServiceAction::Create, "create"),
            (ServiceAction::Events, "events"),
            (ServiceAction::Kill, "kill"),
            (ServiceAction::Pause, "pause"),
            (ServiceAction::Pull, "pull"),
            (ServiceAction::Push, "push"),
            (ServiceAction::Restart, "restart"),
            (ServiceAction::Rm, "rm"),
            (ServiceAction::Start, "start"),
            (ServiceAction::Stop, "stop"),
            (ServiceAction::Top, "top"),
            (ServiceAction::Unpause, "unpause"),
        ];
        for (action, token) in expected {
            assert_eq!(ComposeCommand::all(action).subcommand(), token);
        }
    }

    #[test]
    fn test_logs_follow_flag() {
        assert_eq!(
            args(ComposeCommand::Logs {
                service: None,
                follow: false
            }),
            ["compose", "logs"]
        );
        assert_eq!(
            args(ComposeCommand::Logs {
                service: Some("api".into()),
                follow: true
            }),
            ["compose", "logs", "--follow", "api"]
        );
    }

    #[test]
    fn test_exec_and_run_keep_payload_verbatim() {
        let payload = vec!["sh".to_string(), "-c".to_string(), "echo $HOME && ls".to_string()];
        assert_eq!(
            args(ComposeCommand::Exec {
                service: "web!".into(),
                command: payload.clone()
            }),
            ["compose", "exec", "-T", "web", "sh", "-c", "echo $HOME && ls"]
        );
        assert_eq!(
            args(ComposeCommand::Run {
                service: "worker".into(),
                command: payload
            }),
            ["compose", "run", "--rm", "-T", "worker", "sh", "-c", "echo $HOME && ls"]
        );
    }
}
