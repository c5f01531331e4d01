use crate::event::ChangeEvent;
use std::collections::BTreeMap;


/// Lifecycle state of every server seen in one poll (server name -> state).
///
/// Ordered by name, so diffs and the events built from them come out in
/// a stable order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    states: BTreeMap<String, String>,
}

/// A server whose state differs between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueChange {
    pub name: String,
    pub old_state: String,
    pub new_state: String,
}

/// Categorized comparison of two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Present in both snapshots with a different state
    pub changed: Vec<ValueChange>,
    /// Present only in the new snapshot
    pub added: Vec<String>,
    /// Present only in the old snapshot
    pub removed: Vec<String>,
}

impl Snapshot {
    /// Create an empty snapshot (the initial saved state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(name, state)` pairs.
    ///
    /// A repeated name keeps the last state seen.
    pub fn from_items<I, N, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            states: items
                .into_iter()
                .map(|(name, state)| (name.into(), state.into()))
                .collect(),
        }
    }

    /// State of a server, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.states.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Compare `self` (old) against `new`, field by field.
    pub fn diff(&self, new: &Snapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();

        for (name, new_state) in &new.states {
            match self.states.get(name) {
                Some(old_state) if old_state != new_state => diff.changed.push(ValueChange {
                    name: name.clone(),
                    old_state: old_state.clone(),
                    new_state: new_state.clone(),
                }),
                Some(_) => {}
                None => diff.added.push(name.clone()),
            }
        }

        diff.removed = self
            .states
            .keys()
            .filter(|name| !new.states.contains_key(*name))
            .cloned()
            .collect();

        diff
    }
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// One event per changed value.
    ///
    /// Added and removed servers do not produce events.
    pub fn into_events(self) -> Vec<ChangeEvent> {
        self.changed
            .into_iter()
            .map(|change| ChangeEvent::new(change.name, change.new_state))
            .collect()
    }
}
