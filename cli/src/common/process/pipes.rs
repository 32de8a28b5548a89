//! # Subprocess Pipe Bundle
//!
//! File: cli/src/common/process/pipes.rs
//!
//! `Pipes` owns the three standard streams of one piped subprocess. Reads are
//! full drains: they return everything up to end-of-stream, and a stream that
//! never closes blocks forever. Once a stream has been drained or closed it is
//! gone, and further reads return no data.
//!
use crate::core::error::{ComposeError, Result};
use anyhow::anyhow;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::{Child, ChildStderr, ChildStdin, ChildStdout},
};
use tracing::{debug, warn};

/// The standard streams of one subprocess launched in piped mode.
#[derive(Debug, Default)]
pub struct Pipes {
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

impl Pipes {
    /// Takes whichever streams `child` was spawned with.
    pub fn from_child(child: &mut Child) -> Self {
        Self {
            stdin: child.stdin.take(),
            stdout: child.stdout.take(),
            stderr: child.stderr.take(),
        }
    }

    /// Write end of the subprocess's stdin, if still open.
    pub fn stdin_mut(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.stdin.take()
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    /// Drains stdout to end-of-stream.
    pub async fn stdout_bytes(&mut self) -> Vec<u8> {
        drain(self.stdout.take(), "stdout").await
    }

    /// Drains stderr to end-of-stream.
    pub async fn stderr_bytes(&mut self) -> Vec<u8> {
        drain(self.stderr.take(), "stderr").await
    }

    pub async fn stdout_string(&mut self) -> String {
        String::from_utf8_lossy(&self.stdout_bytes().await).into_owned()
    }

    pub async fn stderr_string(&mut self) -> String {
        String::from_utf8_lossy(&self.stderr_bytes().await).into_owned()
    }

    /// Drains stdout and stderr concurrently and returns stdout's text followed
    /// by stderr's text. The two are never interleaved.
    pub async fn output_string(&mut self) -> String {
        let (out, err) = tokio::join!(
            drain(self.stdout.take(), "stdout"),
            drain(self.stderr.take(), "stderr")
        );
        let mut combined = String::from_utf8_lossy(&out).into_owned();
        combined.push_str(&String::from_utf8_lossy(&err));
        combined
    }

    /// Closes every stream that is still open.
    ///
    /// All three are attempted even if one fails; failures are reported
    /// together as `ComposeError::StreamClose`.
    pub async fn close(&mut self) -> Result<()> {
        let mut failures = Vec::new();

        if let Some(mut stdin) = self.stdin.take() {
            if let Err(e) = stdin.shutdown().await {
                warn!("Failed to close subprocess stdin: {}", e);
                failures.push(format!("stdin: {}", e));
            }
        }
        // Read ends close on drop; nothing there can fail.
        if self.stdout.take().is_some() {
            debug!("Closed subprocess stdout");
        }
        if self.stderr.take().is_some() {
            debug!("Closed subprocess stderr");
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(ComposeError::StreamClose { failures }))
        }
    }

    /// `true` once all three streams have been drained, taken or closed.
    pub fn is_closed(&self) -> bool {
        self.stdin.is_none() && self.stdout.is_none() && self.stderr.is_none()
    }
}

/// Reads `pipe` to completion. Read errors end the drain like end-of-stream
/// does; whatever arrived before the error is kept.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>, name: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut pipe) = pipe else {
        return buf;
    };
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        warn!("Reading subprocess {} stopped early: {}", name, e);
    }
    buf
}
