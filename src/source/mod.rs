//! Lifecycle sources - where snapshots come from.

pub mod weblogic;

use crate::snapshot::Snapshot;
use anyhow::Result;
use async_trait::async_trait;

pub use weblogic::WebLogicSource;

/// Source of server lifecycle snapshots.
///
/// Implementations are stateless with respect to polling: they fetch the
/// current state and return it. Diffing and saved state belong to the
/// [`PollLoop`](crate::runner::PollLoop) that owns the source.
///
/// # Example
/// ```no_run
/// use weblogic_eda::{LifecycleSource, Snapshot};
/// use async_trait::async_trait;
/// use anyhow::Result;
///
/// struct FixedSource;
///
/// #[async_trait]
/// impl LifecycleSource for FixedSource {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     async fn fetch(&self) -> Result<Snapshot> {
///         Ok(Snapshot::from_items([("AdminServer", "RUNNING")]))
///     }
/// }
/// ```
#[async_trait]
pub trait LifecycleSource: Send + Sync {
    /// Label used in logs and status keys.
    fn name(&self) -> &str;

    /// Fetches the current lifecycle state of every server.
    ///
    /// # Returns
    /// * `Ok(Snapshot)` - State of every server in the response
    /// * `Err(...)` - Non-200 status, network, or decode errors; the caller
    ///   skips the cycle and keeps its saved state
    async fn fetch(&self) -> Result<Snapshot>;
}
