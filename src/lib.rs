//! WebLogic EDA - server lifecycle change events for rule engines.
//!
//! Polls the WebLogic RESTful management API for the lifecycle state of
//! every server in a domain and emits one event per server whose state
//! changed since the previous poll.
//!
//! # Architecture
//!
//! ```text
//! WebLogic admin server (serverLifeCycleRuntimes)
//!          ↓  GET + basic auth, every `interval` seconds
//! ┌─────────────────────────────────────────┐
//! │       LifecycleSource                    │
//! │  - Fetch collection                      │
//! │  - Project to name -> state Snapshot     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       PollLoop (one per source)          │
//! │  - Diff against saved state              │
//! │  - One ChangeEvent per changed value     │
//! │  - Carry state forward                   │
//! └─────────────────────────────────────────┘
//!          ↓
//!     EventQueue → rule engine
//! ```
//!
//! # Events
//!
//! ```json
//! {"wl_event": {"managed-1": "SHUTDOWN"}}
//! ```
//!
//! Servers that appear or disappear between polls update the saved state
//! but do not produce events.

pub mod config;
pub mod event;
pub mod manager;
pub mod queue;
pub mod runner;
pub mod snapshot;
pub mod source;

pub use config::{load_config, EdaConfig, SourceConfig};
pub use event::ChangeEvent;
pub use manager::SourceManager;
pub use queue::{EventQueue, JsonLinesQueue, StdoutQueue};
pub use runner::{CycleOutcome, PollLoop, SourceStatus};
pub use snapshot::{Snapshot, SnapshotDiff, ValueChange};
pub use source::{LifecycleSource, WebLogicSource};
