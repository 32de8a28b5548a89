//! # Background Process Tracker
//!
//! File: cli/src/common/process/tracker.rs
//!
//! ## Overview
//!
//! A counting join over subprocesses that run in the background. Each tracked
//! child gets one tokio task whose only job is to await the child's exit and
//! count it down; `wait` resolves once the outstanding count reaches zero,
//! including children registered while a `wait` is already pending.
//!
//! Exit failures never change the counting. They are logged and collected so
//! `wait` can hand them back in its `WaitReport`.
//!
use std::{
    process::ExitStatus,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tokio::{process::Child, sync::Notify};
use tracing::{debug, error, warn};

/// A tracked subprocess that did not exit successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInvocation {
    /// Human-readable command line of the subprocess.
    pub command: String,
    /// Exit status, or `None` if waiting on the child itself failed.
    pub status: Option<ExitStatus>,
}

/// What `ProcessTracker::wait` observed since the previous `wait`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WaitReport {
    /// Number of subprocesses that finished.
    pub completed: usize,
    /// Those among them that exited unsuccessfully.
    pub failures: Vec<FailedInvocation>,
}

impl WaitReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    outstanding: AtomicUsize,
    all_done: Notify,
    completed: AtomicUsize,
    failures: Mutex<Vec<FailedInvocation>>,
}

/// Cloneable handle; all clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct ProcessTracker {
    state: Arc<TrackerState>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `child` and spawns the task that awaits its exit.
    ///
    /// Must be called from within a tokio runtime.
    pub fn track(&self, mut child: Child, command: String) {
        self.state.outstanding.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Tracking '{}' (pid {:?}), {} outstanding",
            command,
            child.id(),
            self.outstanding()
        );

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let failure = match child.wait().await {
                Ok(status) if status.success() => {
                    debug!("'{}' exited successfully", command);
                    None
                }
                Ok(status) => {
                    warn!("'{}' exited with status {}", command, status);
                    Some(FailedInvocation {
                        command,
                        status: Some(status),
                    })
                }
                Err(e) => {
                    error!("Failed to wait on '{}': {}", command, e);
                    Some(FailedInvocation {
                        command,
                        status: None,
                    })
                }
            };
            state.finish(failure);
        });
    }

    /// Number of tracked subprocesses that have not exited yet.
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::SeqCst)
    }

    /// Resolves once every tracked subprocess has exited.
    ///
    /// Returns immediately when nothing is outstanding. The report covers all
    /// completions since the previous `wait` and resets afterwards.
    pub async fn wait(&self) -> WaitReport {
        loop {
            let notified = self.state.all_done.notified();
            tokio::pin!(notified);
            // Register interest before checking so a completion between the
            // check and the await is not lost.
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                break;
            }
            notified.await;
        }
        self.state.take_report()
    }
}

impl TrackerState {
    fn finish(&self, failure: Option<FailedInvocation>) {
        if let Some(failure) = failure {
            self.lock_failures().push(failure);
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.all_done.notify_waiters();
        }
    }

    fn take_report(&self) -> WaitReport {
        WaitReport {
            completed: self.completed.swap(0, Ordering::SeqCst),
            failures: std::mem::take(&mut *self.lock_failures()),
        }
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, Vec<FailedInvocation>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
