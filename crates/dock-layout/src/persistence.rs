#![forbid(unsafe_code)]

//! Keyed durable storage for layout snapshots.
//!
//! The engine never talks to a backend directly. It is handed a
//! [`LayoutStore`] and goes through [`load_state`] / [`save_state`], which
//! wrap the raw strings in a versioned [`LayoutSnapshot`].
//!
//! Storage failures are never fatal. They surface as a
//! [`PersistenceWarning`] and the in-memory state stays authoritative.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use dock_core::geometry::PercentBounds;

use crate::snapshot::{LayoutSnapshot, SanitizeNote, sanitize};
use crate::state::LayoutState;

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend refused the write for lack of space.
    QuotaExceeded { key: String, bytes: usize },
    /// Any other backend failure (I/O, permissions, ...).
    Backend { key: String, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded { key, bytes } => {
                write!(f, "storage quota exceeded writing {bytes} bytes to \"{key}\"")
            }
            Self::Backend { key, message } => write!(f, "storage error for \"{key}\": {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Keyed string store (one serialized snapshot per layout id).
pub trait LayoutStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: LayoutStore + ?Sized> LayoutStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

impl<S: LayoutStore + ?Sized> LayoutStore for Rc<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

/// In-process store. Clones share the same entries.
///
/// An optional byte quota over all stored values emulates a size-limited
/// backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_owned(),
                    bytes: value.len(),
                });
            }
        }
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Non-fatal persistence problem.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceWarning {
    /// The backend failed to read.
    LoadFailed { key: String, error: StoreError },
    /// Stored data could not be used; the engine fell back to initial panels.
    SnapshotRejected { key: String, reason: String },
    /// The backend failed to write; the in-memory state is unaffected.
    SaveFailed { key: String, error: StoreError },
    /// The state could not be serialized.
    EncodeFailed { key: String, reason: String },
}

impl PersistenceWarning {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::LoadFailed { key, .. }
            | Self::SnapshotRejected { key, .. }
            | Self::SaveFailed { key, .. }
            | Self::EncodeFailed { key, .. } => key,
        }
    }
}

impl fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed { error, .. } => write!(f, "failed to load layout: {error}"),
            Self::SnapshotRejected { key, reason } => {
                write!(f, "discarded stored layout \"{key}\": {reason}")
            }
            Self::SaveFailed { error, .. } => write!(f, "failed to persist layout: {error}"),
            Self::EncodeFailed { key, reason } => {
                write!(f, "failed to encode layout \"{key}\": {reason}")
            }
        }
    }
}

/// Result of reading the stored layout at mount.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Restored {
        state: LayoutState,
        notes: Vec<SanitizeNote>,
    },
    Missing,
    Rejected(PersistenceWarning),
}

/// Read, decode and sanitize the snapshot stored under `key`.
pub fn load_state(store: &dyn LayoutStore, key: &str, bounds: PercentBounds) -> LoadOutcome {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadOutcome::Missing,
        Err(error) => {
            return LoadOutcome::Rejected(PersistenceWarning::LoadFailed {
                key: key.to_owned(),
                error,
            });
        }
    };
    let rejected = |reason: String| {
        LoadOutcome::Rejected(PersistenceWarning::SnapshotRejected {
            key: key.to_owned(),
            reason,
        })
    };
    let snapshot = match LayoutSnapshot::decode(&raw)
        .and_then(|snapshot| snapshot.check_owner(key).map(|()| snapshot))
    {
        Ok(snapshot) => snapshot,
        Err(err) => return rejected(err.to_string()),
    };
    match sanitize(snapshot.state, bounds) {
        Ok((state, notes)) => LoadOutcome::Restored { state, notes },
        Err(err) => rejected(err.to_string()),
    }
}

/// Encode `state` as a snapshot and write it under `key`.
pub fn save_state(
    store: &dyn LayoutStore,
    key: &str,
    state: &LayoutState,
) -> Result<(), PersistenceWarning> {
    let raw = LayoutSnapshot::new(key, state.clone())
        .encode()
        .map_err(|err| PersistenceWarning::EncodeFailed {
            key: key.to_owned(),
            reason: err.to_string(),
        })?;
    store
        .save(key, &raw)
        .map_err(|error| PersistenceWarning::SaveFailed {
            key: key.to_owned(),
            error,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelDescriptor;
    use crate::registry::PanelRegistry;

    struct BrokenStore;

    impl LayoutStore for BrokenStore {
        fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Backend {
                key: key.to_owned(),
                message: "disk on fire".into(),
            })
        }

        fn save(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            self.load(key).map(|_| ())
        }
    }

    fn state() -> LayoutState {
        LayoutState::new(
            PanelRegistry::from_panels([PanelDescriptor::new("chart", "Chart")]).unwrap(),
        )
    }

    #[test]
    fn save_then_load_restores_state() {
        let store = MemoryStore::new();
        save_state(&store, "trading", &state()).unwrap();
        match load_state(&store, "trading", PercentBounds::default()) {
            LoadOutcome::Restored { state: loaded, notes } => {
                assert_eq!(loaded, state());
                assert!(notes.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_key_is_missing() {
        let store = MemoryStore::new();
        assert_eq!(
            load_state(&store, "nothing", PercentBounds::default()),
            LoadOutcome::Missing
        );
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.insert("k", "v");
        assert_eq!(handle.get("k").as_deref(), Some("v"));
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let store = MemoryStore::new().with_quota(16);
        let err = store.save("k", "this value is far too long").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { bytes: 26, .. }));
        assert!(store.is_empty());
        // Replacing an existing key only counts the new value.
        store.save("k", "0123456789").unwrap();
        store.save("k", "9876543210").unwrap();
    }

    #[test]
    fn corrupt_snapshot_is_rejected_with_reason() {
        let store = MemoryStore::new();
        store.insert("trading", "{not json");
        match load_state(&store, "trading", PercentBounds::default()) {
            LoadOutcome::Rejected(PersistenceWarning::SnapshotRejected { key, reason }) => {
                assert_eq!(key, "trading");
                assert!(reason.starts_with("failed to parse layout snapshot"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn snapshot_of_another_layout_is_rejected() {
        let store = MemoryStore::new();
        let raw = LayoutSnapshot::new("desk.1", state()).encode().unwrap();
        store.insert("desk_1", raw);
        match load_state(&store, "desk_1", PercentBounds::default()) {
            LoadOutcome::Rejected(PersistenceWarning::SnapshotRejected { key, reason }) => {
                assert_eq!(key, "desk_1");
                assert_eq!(reason, "snapshot belongs to layout \"desk.1\", not \"desk_1\"");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn snapshot_without_owner_loads_under_any_key() {
        let store = MemoryStore::new();
        store.insert("desk", r#"{"state":{"panels":[{"id":"chart","title":"Chart"}]}}"#);
        assert!(matches!(
            load_state(&store, "desk", PercentBounds::default()),
            LoadOutcome::Restored { .. }
        ));
    }

    #[test]
    fn backend_failures_become_warnings() {
        let outcome = load_state(&BrokenStore, "k", PercentBounds::default());
        assert!(matches!(
            outcome,
            LoadOutcome::Rejected(PersistenceWarning::LoadFailed { .. })
        ));
        let warning = save_state(&BrokenStore, "k", &state()).unwrap_err();
        assert_eq!(warning.key(), "k");
        assert_eq!(
            warning.to_string(),
            "failed to persist layout: storage error for \"k\": disk on fire"
        );
    }
}
