//! # Terminal Relay for Piped Subprocesses
//!
//! File: cli/src/commands/stream.rs
//!
//! Copies a piped compose subprocess's stdout/stderr to the host terminal as
//! the bytes arrive, optionally forwarding host stdin into the child. Used by
//! every handler that dispatches a subcommand.
//!
use anyhow::anyhow;
use composectl::{
    common::process::{FailedInvocation, Pipes, WaitReport},
    ComposeClient, ComposeError, Dispatch, Result,
};
use std::{io::Read, thread};
use tokio::{
    io::{self, AsyncRead, AsyncWrite, AsyncWriteExt},
    process::ChildStdin,
    sync::mpsc,
    task,
};
use tracing::{debug, warn};

const STDIN_CHUNK: usize = 8 * 1024;

/// Relays a dispatch result to the terminal, then joins every subprocess the
/// client has launched.
pub async fn finish(client: &ComposeClient, dispatch: Dispatch, forward_stdin: bool) -> Result<()> {
    if let Dispatch::Streaming(pipes) = dispatch {
        relay(pipes, forward_stdin).await?;
    }
    report_to_result(client.wait().await)
}

/// Streams `pipes` to the host until the child closes stdout and stderr.
pub async fn relay(mut pipes: Pipes, forward_stdin: bool) -> Result<()> {
    // Without forwarding, close stdin right away so the child sees EOF.
    let stdin_task = match pipes.take_stdin() {
        Some(child_stdin) if forward_stdin => {
            let chunks = spawn_reader(std::io::stdin());
            Some(task::spawn(forward(chunks, child_stdin)))
        }
        Some(mut child_stdin) => {
            if let Err(e) = child_stdin.shutdown().await {
                debug!("Error closing unused subprocess stdin: {}", e);
            }
            None
        }
        None => None,
    };

    let out = copy_to(pipes.take_stdout(), io::stdout(), "stdout");
    let err = copy_to(pipes.take_stderr(), io::stderr(), "stderr");
    tokio::join!(out, err);

    if let Some(handle) = stdin_task {
        // Dropping the receiver ends the reader thread at its next chunk; a
        // read still blocked on the host is left behind and dies with the process.
        handle.abort();
    }
    pipes.close().await
}

/// Reads `reader` on a dedicated OS thread and hands the chunks over a channel.
fn spawn_reader<R: Read + Send + 'static>(reader: R) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || pump(reader, tx));
    rx
}

/// Returns at end-of-input, on a read error, or once the receiver is gone.
fn pump<R: Read>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = vec![0u8; STDIN_CHUNK];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.blocking_send(buf[..n].to_vec()).is_err() {
                    debug!("Stdin forwarding stopped; discarding further input");
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Error reading host stdin: {}", e);
                break;
            }
        }
    }
}

async fn forward(mut chunks: mpsc::Receiver<Vec<u8>>, mut child_stdin: ChildStdin) {
    let mut forwarded = 0usize;
    while let Some(chunk) = chunks.recv().await {
        match child_stdin.write_all(&chunk).await {
            Ok(()) => forwarded += chunk.len(),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("Subprocess closed stdin");
                return;
            }
            Err(e) => {
                warn!("Error forwarding stdin: {}", e);
                return;
            }
        }
    }
    debug!("Forwarded {} bytes of stdin", forwarded);
    if let Err(e) = child_stdin.shutdown().await {
        debug!("Error shutting down subprocess stdin: {}", e);
    }
}

async fn copy_to<R, W>(reader: Option<R>, mut writer: W, name: &str)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };
    if let Err(e) = io::copy(&mut reader, &mut writer).await {
        warn!("Error relaying subprocess {}: {}", name, e);
    }
    let _ = writer.flush().await;
}

/// Turns a tracker report into the command's result.
pub fn report_to_result(report: WaitReport) -> Result<()> {
    debug!("{} subprocess(es) finished", report.completed);
    match report.failures.into_iter().next() {
        None => Ok(()),
        Some(FailedInvocation {
            command,
            status: Some(status),
        }) => Err(anyhow!(ComposeError::CommandFailed { command, status })),
        Some(FailedInvocation {
            command,
            status: None,
        }) => Err(anyhow!("Lost track of '{}' before it exited", command)),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Stdio};
    use std::time::Duration;
    use tokio::process::Command;

    #[test]
    fn test_clean_report_is_ok() {
        let report = WaitReport {
            completed: 3,
            failures: vec![],
        };
        assert!(report_to_result(report).is_ok());
    }

    #[test]
    fn test_failed_report_is_command_failed() {
        let report = WaitReport {
            completed: 1,
            failures: vec![FailedInvocation {
                command: "docker compose build".into(),
                status: Some(ExitStatus::from_raw(1 << 8)),
            }],
        };
        let err = report_to_result(report).unwrap_err();
        assert!(err.to_string().contains("'docker compose build' exited"));
    }

    #[test]
    fn test_pump_forwards_everything_then_closes() {
        let input = vec![7u8; STDIN_CHUNK * 2 + 10];
        let mut rx = spawn_reader(std::io::Cursor::new(input.clone()));

        let mut received = Vec::new();
        while let Some(chunk) = rx.blocking_recv() {
            received.extend(chunk);
        }
        assert_eq!(received, input);
    }

    #[test]
    fn test_pump_stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(1);
        // An endless reader: only the closed channel can end the pump.
        let reader = thread::spawn(move || pump(std::io::repeat(1), tx));
        drop(rx);
        reader.join().unwrap();
    }

    #[tokio::test]
    async fn test_forward_writes_chunks_and_closes_child_stdin() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let mut pipes = Pipes::from_child(&mut child);

        let (tx, rx) = mpsc::channel(4);
        tx.send(b"hello ".to_vec()).await.unwrap();
        tx.send(b"world".to_vec()).await.unwrap();
        drop(tx);
        forward(rx, pipes.take_stdin().unwrap()).await;

        let out = tokio::time::timeout(Duration::from_secs(5), pipes.stdout_string())
            .await
            .expect("cat should see EOF once forwarding ends");
        assert_eq!(out, "hello world");
        child.wait().await.unwrap();
    }
}
