use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

/// ChangeEvent reports the new lifecycle state of one server.
///
/// Serializes to the shape rule engines match on:
/// `{"wl_event": {"<server name>": "<new state>"}}`.
/// Exactly one server is carried per event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Single-entry map: server name -> new state
    pub wl_event: BTreeMap<String, String>,
}

impl ChangeEvent {
    /// Create an event for one server's new state.
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        let mut wl_event = BTreeMap::new();
        wl_event.insert(name.into(), state.into());
        Self { wl_event }
    }

    /// Server name carried by this event.
    pub fn name(&self) -> &str {
        self.wl_event.keys().next().map(String::as_str).unwrap_or_default()
    }

    /// New state carried by this event.
    pub fn state(&self) -> &str {
        self.wl_event
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or_default()
    }
}
