//! Output queues for change events.

use crate::event::ChangeEvent;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};

/// Destination for change events.
///
/// `put` may suspend (a full bounded channel waits for the consumer);
/// it never drops events. An error means the consumer is gone and is
/// fatal for the loop that produced the event.
#[async_trait]
pub trait EventQueue: Send + Sync {
    async fn put(&self, event: ChangeEvent) -> Result<()>;
}

#[async_trait]
impl EventQueue for mpsc::Sender<ChangeEvent> {
    async fn put(&self, event: ChangeEvent) -> Result<()> {
        self.send(event)
            .await
            .map_err(|_| anyhow::anyhow!("Event queue closed"))
    }
}

#[async_trait]
impl EventQueue for mpsc::UnboundedSender<ChangeEvent> {
    async fn put(&self, event: ChangeEvent) -> Result<()> {
        self.send(event)
            .map_err(|_| anyhow::anyhow!("Event queue closed"))
    }
}

/// Queue that writes each event as one JSON line to an async writer.
pub struct JsonLinesQueue<W> {
    out: Mutex<W>,
}

/// Stand-in for a rule engine when running standalone.
pub type StdoutQueue = JsonLinesQueue<tokio::io::Stdout>;

impl<W> JsonLinesQueue<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl StdoutQueue {
    pub fn new() -> Self {
        Self::with_writer(tokio::io::stdout())
    }
}

impl Default for StdoutQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<W> EventQueue for JsonLinesQueue<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn put(&self, event: ChangeEvent) -> Result<()> {
        let mut line = serde_json::to_vec(&event).context("Failed to serialize event")?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .context("Failed to write event")?;
        out.flush().await.context("Failed to flush event output")
    }
}
