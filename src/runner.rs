//! Per-source poll/diff/emit loop.
//!
//! Each monitored admin server gets its own loop that fetches a snapshot,
//! diffs it against the saved state from the previous cycle, and puts one
//! event per changed value on the output queue.

use crate::queue::EventQueue;
use crate::snapshot::Snapshot;
use crate::source::LifecycleSource;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Status information for one loop.
#[derive(Clone, Debug, Default)]
pub struct SourceStatus {
    /// Last successful poll timestamp
    pub last_poll: Option<DateTime<Utc>>,
    /// Last error message (cleared by the next successful poll)
    pub last_error: Option<String>,
    /// Total number of successful polls
    pub poll_count: u64,
    /// Total number of failed polls
    pub error_count: u64,
    /// Total number of events put on the queue
    pub events_emitted: u64,
    /// Servers in the saved state
    pub tracked_servers: usize,
}

/// Result of one poll cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot equal to the saved state; nothing emitted
    Unchanged,
    /// Snapshot differed; saved state replaced
    Updated { events: usize },
    /// Fetch failed; saved state kept
    Skipped,
}

/// Poll/diff/emit loop for one source.
///
/// Owns the saved state exclusively, so any number of loops can run side
/// by side without sharing anything but the output queue.
pub struct PollLoop {
    source: Arc<dyn LifecycleSource>,
    interval: Duration,
    saved_state: Snapshot,
    status: Arc<Mutex<SourceStatus>>,
}

impl PollLoop {
    /// Creates a loop with empty saved state.
    pub fn new(source: Arc<dyn LifecycleSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            saved_state: Snapshot::new(),
            status: Arc::new(Mutex::new(SourceStatus::default())),
        }
    }

    /// Returns a clone of the status tracker for external monitoring.
    pub fn status(&self) -> Arc<Mutex<SourceStatus>> {
        Arc::clone(&self.status)
    }

    /// Snapshot from the last successful poll.
    pub fn saved_state(&self) -> &Snapshot {
        &self.saved_state
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Runs one cycle: fetch, diff, emit, carry state forward.
    ///
    /// Fetch failures are logged and reported as [`CycleOutcome::Skipped`].
    /// Only a closed queue returns `Err`.
    pub async fn poll_once(&mut self, queue: &dyn EventQueue) -> Result<CycleOutcome> {
        let current = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    source = %self.source.name(),
                    error = %format!("{:#}", e),
                    "Poll failed, keeping saved state"
                );
                let mut status = self.status.lock().await;
                status.last_error = Some(format!("{:#}", e));
                status.error_count += 1;
                return Ok(CycleOutcome::Skipped);
            }
        };

        let outcome = if current == self.saved_state {
            debug!(source = %self.source.name(), "No state change");
            CycleOutcome::Unchanged
        } else {
            let diff = self.saved_state.diff(&current);

            if !diff.added.is_empty() || !diff.removed.is_empty() {
                // Membership changes are tracked but not emitted
                debug!(
                    source = %self.source.name(),
                    added = ?diff.added,
                    removed = ?diff.removed,
                    "Server set changed"
                );
            }

            let events = diff.into_events();
            let event_count = events.len();
            for event in events {
                debug!(
                    source = %self.source.name(),
                    server = %event.name(),
                    state = %event.state(),
                    "State changed"
                );
                queue
                    .put(event)
                    .await
                    .context("Failed to put event on queue")?;
            }

            if event_count > 0 {
                info!(
                    source = %self.source.name(),
                    event_count = event_count,
                    "Emitted change events"
                );
            }

            self.saved_state = current;
            CycleOutcome::Updated {
                events: event_count,
            }
        };

        let mut status = self.status.lock().await;
        status.last_poll = Some(Utc::now());
        status.last_error = None;
        status.poll_count += 1;
        status.tracked_servers = self.saved_state.len();
        if let CycleOutcome::Updated { events } = outcome {
            status.events_emitted += events as u64;
        }

        Ok(outcome)
    }

    /// Polls forever, sleeping `interval` between cycles.
    ///
    /// Only returns on a fatal error (closed queue). Cancel by aborting the
    /// task; the saved state is only replaced after a cycle's events are
    /// all queued.
    pub async fn run(mut self, queue: Arc<dyn EventQueue>) -> Result<()> {
        info!(
            source = %self.source.name(),
            interval_secs = self.interval.as_secs(),
            "Starting poll loop"
        );

        loop {
            self.poll_once(queue.as_ref()).await?;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Starts the loop (non-blocking).
    ///
    /// Returns a JoinHandle that can be aborted for shutdown.
    pub fn start(self, queue: Arc<dyn EventQueue>) -> JoinHandle<()> {
        let name = self.source.name().to_string();
        tokio::spawn(async move {
            if let Err(e) = self.run(queue).await {
                error!(
                    source = %name,
                    error = %format!("{:#}", e),
                    "Poll loop stopped"
                );
            }
        })
    }
}
