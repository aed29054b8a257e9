//! Save and restore of table components.
//!
//! Each persistent component implements [`Saveable`] with a stable key and a
//! serde state type. A [`SnapshotRegistry`] collects those components for a root
//! type and turns them into a single keyed JSON document ([`Snapshot`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::SnapshotError;

/// A component with persistent state.
pub trait Saveable {
    /// Key of this component inside a [`Snapshot`]. Must be unique per registry.
    const SAVE_KEY: &'static str;
    type State: Serialize + DeserializeOwned;

    fn capture_state(&self) -> Self::State;

    /// Apply `state`. Must leave the component unchanged on error.
    fn restore_state(&mut self, state: Self::State) -> Result<(), SnapshotError>;
}

/// Captured state of every registered component, keyed by save key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type CaptureFn<R> = Box<dyn Fn(&R) -> Result<Value, SnapshotError>>;
type RestoreFn<R> = Box<dyn Fn(&mut R, Value) -> Result<(), SnapshotError>>;

struct Entry<R> {
    key: &'static str,
    capture: CaptureFn<R>,
    restore: RestoreFn<R>,
}

/// Ordered set of saveable components reachable from a root `R`.
pub struct SnapshotRegistry<R> {
    entries: Vec<Entry<R>>,
}

impl<R> Default for SnapshotRegistry<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R: 'static> fmt::Debug for SnapshotRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotRegistry")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<R: 'static> SnapshotRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw capture and restore closures under `key`.
    pub fn register<C, S>(
        &mut self,
        key: &'static str,
        capture: C,
        restore: S,
    ) -> Result<(), SnapshotError>
    where
        C: Fn(&R) -> Result<Value, SnapshotError> + 'static,
        S: Fn(&mut R, Value) -> Result<(), SnapshotError> + 'static,
    {
        if self.entries.iter().any(|entry| entry.key == key) {
            return Err(SnapshotError::DuplicateKey(key));
        }
        self.entries.push(Entry {
            key,
            capture: Box::new(capture),
            restore: Box::new(restore),
        });
        Ok(())
    }

    /// Register a [`Saveable`] component found through the given accessors.
    pub fn register_component<T: Saveable + 'static>(
        &mut self,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Result<(), SnapshotError> {
        self.register(
            T::SAVE_KEY,
            move |root| {
                serde_json::to_value(get(root).capture_state()).map_err(|source| {
                    SnapshotError::Serde {
                        key: T::SAVE_KEY.to_string(),
                        source,
                    }
                })
            },
            move |root, value| {
                let state: T::State =
                    serde_json::from_value(value).map_err(|source| SnapshotError::Serde {
                        key: T::SAVE_KEY.to_string(),
                        source,
                    })?;
                get_mut(root).restore_state(state)
            },
        )
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capture(&self, root: &R) -> Result<Snapshot, SnapshotError> {
        let mut snapshot = Snapshot::default();
        for entry in &self.entries {
            snapshot.insert(entry.key, (entry.capture)(root)?);
        }
        Ok(snapshot)
    }

    /// Restore every registered component present in `snapshot`, in
    /// registration order. Missing keys leave their component untouched.
    /// Returns the number of components restored.
    pub fn restore(&self, root: &mut R, snapshot: &Snapshot) -> Result<usize, SnapshotError> {
        for key in snapshot.keys() {
            if !self.entries.iter().any(|entry| entry.key == key) {
                warn!(key, "snapshot entry has no registered component");
            }
        }
        let mut restored = 0;
        for entry in &self.entries {
            let Some(value) = snapshot.get(entry.key) else {
                debug!(key = entry.key, "no saved state");
                continue;
            };
            (entry.restore)(root, value.clone())?;
            restored += 1;
        }
        Ok(restored)
    }
}
