//! # Project Inspection Handlers
//!
//! File: cli/src/commands/inspect.rs
//!
//! ## Overview
//!
//! Implements `composectl ps`, `networks`, `volumes`, `images` and `port`.
//! None of these start a subprocess: they read from the Engine API through
//! the client's label-scoped listings and print plain-text summaries.
//!
//! ```bash
//! composectl ps --all
//! composectl port web
//! ```
//!
use bollard::models::{ContainerSummary, Port, PortTypeEnum};
use chrono::DateTime;
use clap::Args;
use composectl::{compose::SERVICE_LABEL, ComposeClient, Result};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PsArgs {
    /// Include stopped containers.
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PortArgs {
    /// Service whose published ports to show.
    pub service: String,

    /// Only show the host port bound to this container port.
    #[arg(long)]
    pub private: Option<u16>,
}

pub async fn handle_ps(client: &ComposeClient, args: PsArgs) -> Result<()> {
    info!("Listing containers of '{}' (All: {})", client.project_name(), args.all);
    let containers = client.containers(args.all).await?;

    if containers.is_empty() {
        println!(
            "No containers found for project '{}'{}.",
            client.project_name(),
            if args.all { "" } else { " (running)" }
        );
        if !args.all {
            println!("Try running with --all to include stopped containers.");
        }
        return Ok(());
    }

    println!("--- Project '{}' ---", client.project_name());
    for container in &containers {
        print_container_summary(container);
        println!("--------------------");
    }
    println!("Found {} container(s).", containers.len());
    Ok(())
}

pub async fn handle_networks(client: &ComposeClient) -> Result<()> {
    let networks = client.networks().await?;
    println!("{:<14} {:<32} {}", "ID", "NAME", "DRIVER");
    for n in &networks {
        println!(
            "{:<14} {:<32} {}",
            short_id(n.id.as_deref()),
            n.name.as_deref().unwrap_or("N/A"),
            n.driver.as_deref().unwrap_or("N/A")
        );
    }
    Ok(())
}

pub async fn handle_volumes(client: &ComposeClient) -> Result<()> {
    let volumes = client.volumes().await?;
    println!("{:<32} {:<10} {}", "NAME", "DRIVER", "MOUNTPOINT");
    for v in &volumes {
        println!("{:<32} {:<10} {}", v.name, v.driver, v.mountpoint);
    }
    Ok(())
}

pub async fn handle_images(client: &ComposeClient) -> Result<()> {
    let images = client.images().await?;
    println!("{:<14} {:<40} {:>10}", "ID", "TAGS", "SIZE (MB)");
    for img in &images {
        let tags = if img.repo_tags.is_empty() {
            "<none>".to_string()
        } else {
            img.repo_tags.join(", ")
        };
        println!(
            "{:<14} {:<40} {:>10.1}",
            short_id(Some(img.id.trim_start_matches("sha256:"))),
            tags,
            img.size as f64 / 1_000_000.0
        );
    }
    Ok(())
}

pub async fn handle_port(client: &ComposeClient, args: PortArgs) -> Result<()> {
    if let Some(private) = args.private {
        match client.published_port(&args.service, private).await? {
            Some(public) => println!("{}", public),
            None => println!("Port {} of '{}' is not published.", private, args.service),
        }
        return Ok(());
    }

    let ports = client.port(&args.service).await?;
    if ports.is_empty() {
        println!("No running containers with ports for service '{}'.", args.service);
    }
    for p in &ports {
        println!("{}", format_port(p));
    }
    Ok(())
}

fn short_id(id: Option<&str>) -> String {
    id.map_or_else(|| "N/A".to_string(), |id| id.chars().take(12).collect())
}

fn format_created(ts: Option<i64>) -> String {
    ts.and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(|| "N/A".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// `HOST_IP:HOST_PORT->CONTAINER_PORT/PROTO`, or just the container side when unpublished.
fn format_port(p: &Port) -> String {
    let proto = match p.typ {
        Some(PortTypeEnum::TCP) => "/tcp",
        Some(PortTypeEnum::UDP) => "/udp",
        Some(PortTypeEnum::SCTP) => "/sctp",
        _ => "",
    };
    match p.public_port {
        Some(public) => format!(
            "{}:{}->{}{}",
            p.ip.as_deref().unwrap_or("0.0.0.0"),
            public,
            p.private_port,
            proto
        ),
        None => format!("{}{}", p.private_port, proto),
    }
}

fn print_container_summary(container: &ContainerSummary) {
    let service = container
        .labels
        .as_ref()
        .and_then(|l| l.get(SERVICE_LABEL))
        .map_or("N/A", String::as_str);
    let names = container.names.as_ref().map_or("N/A".to_string(), |names| {
        names
            .iter()
            .map(|n| n.trim_start_matches('/'))
            .collect::<Vec<_>>()
            .join(", ")
    });

    println!("ID:      {}", short_id(container.id.as_deref()));
    println!("Service: {}", service);
    println!("Names:   {}", names);
    println!("Image:   {}", container.image.as_deref().unwrap_or("N/A"));
    println!("Created: {}", format_created(container.created));
    println!("Status:  {}", container.status.as_deref().unwrap_or("N/A"));
    match container.ports.as_deref() {
        Some(ports) if !ports.is_empty() => {
            println!("Ports:");
            for p in ports {
                println!("  - {}", format_port(p));
            }
        }
        _ => println!("Ports:   <none>"),
    }
}
