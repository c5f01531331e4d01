//! Source manager - Orchestrates poll loop lifecycle.
//!
//! Builds one source and one poll loop per configured admin server,
//! tracks their status, and aborts them all on shutdown.

use crate::config::SourceConfig;
use crate::queue::EventQueue;
use crate::runner::{PollLoop, SourceStatus};
use crate::source::{LifecycleSource, WebLogicSource};
use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

/// Status tracking per source name.
pub type StatusMap = HashMap<String, Arc<Mutex<SourceStatus>>>;

/// Source manager - runs every configured poll loop.
///
/// Loops are independent: each owns its saved state, and they share only
/// the output queue.
pub struct SourceManager {
    configs: Vec<SourceConfig>,
    handles: Vec<(String, JoinHandle<()>)>,
    status_map: StatusMap,
}

impl SourceManager {
    pub fn new(configs: Vec<SourceConfig>) -> Self {
        Self {
            configs,
            handles: Vec::new(),
            status_map: HashMap::new(),
        }
    }

    /// Status tracker for every started loop, keyed by source name.
    pub fn status_map(&self) -> &StatusMap {
        &self.status_map
    }

    /// Starts a poll loop for every configured source.
    ///
    /// All sources are built before any loop starts, so a bad config starts
    /// nothing. Source names must be unique.
    ///
    /// # Returns
    /// Number of loops started
    pub async fn start(&mut self, queue: Arc<dyn EventQueue>) -> Result<usize> {
        let mut seen = HashSet::new();
        for config in &self.configs {
            if !seen.insert(config.name.as_str()) {
                bail!("Duplicate source name '{}'", config.name);
            }
        }

        let mut sources = Vec::with_capacity(self.configs.len());
        for config in &self.configs {
            let source = WebLogicSource::new(config)
                .with_context(|| format!("Failed to create source '{}'", config.name))?;
            info!(source = %config.name, url = %source.url(), "Source configured");
            sources.push((Arc::new(source) as Arc<dyn LifecycleSource>, config.interval()));
        }

        for (source, interval) in sources {
            self.start_loop(source, interval, Arc::clone(&queue));
        }

        info!(loop_count = self.handles.len(), "Source manager started");
        Ok(self.handles.len())
    }

    /// Starts a loop for an already-built source.
    pub fn start_loop(
        &mut self,
        source: Arc<dyn LifecycleSource>,
        interval: std::time::Duration,
        queue: Arc<dyn EventQueue>,
    ) {
        let poll = PollLoop::new(source, interval);
        let name = poll.name().to_string();
        self.status_map.insert(name.clone(), poll.status());
        self.handles.push((name, poll.start(queue)));
    }

    /// Aborts every loop and waits for them to finish.
    pub async fn shutdown(&mut self) {
        for (name, handle) in self.handles.drain(..) {
            handle.abort();
            let _ = handle.await;
            info!(source = %name, "Poll loop stopped");
        }
    }
}
