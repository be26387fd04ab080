#![forbid(unsafe_code)]

//! Persisted layout schema v1 with versioning and load-time sanitizing.
//!
//! A [`LayoutSnapshot`] wraps one [`LayoutState`] with its layout id and a
//! schema version.
//!
//! # Schema Versioning Policy
//!
//! - **Additive fields** carry serde defaults and need no version bump; a
//!   snapshot missing them still loads.
//! - **Breaking changes** require incrementing [`LAYOUT_SCHEMA_VERSION`] and
//!   adding an arm to [`migrate`].
//! - Snapshots from a newer schema are rejected with a diagnostic rather than
//!   partially interpreted.
//!
//! # Sanitizing
//!
//! Stored data is not trusted. [`sanitize`] rejects snapshots with duplicate
//! panel ids, clears a dangling fullscreen reference, and re-clamps geometry
//! to the current bounds, reporting each repair as a [`SanitizeNote`].

use std::collections::BTreeMap;
use std::fmt;

use dock_core::geometry::PercentBounds;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::panel::PanelId;
use crate::state::{LayoutState, clamp_panel};

/// Current layout schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// Persisted layout state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    #[serde(default)]
    pub layout_id: String,
    pub state: LayoutState,
    /// Forward-compatible extension bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

fn default_schema_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(layout_id: impl Into<String>, state: LayoutState) -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            layout_id: layout_id.into(),
            state,
            extensions: BTreeMap::new(),
        }
    }

    /// Serialize to the stored JSON form.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Serialize)
    }

    /// Parse the stored JSON form and migrate it to the current schema.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw).map_err(SnapshotError::Deserialize)?;
        migrate(snapshot)
    }

    /// Reject a snapshot written for a different layout id.
    ///
    /// An empty `layout_id` (hand-written or pre-id snapshots) belongs to
    /// whichever key it is stored under.
    pub fn check_owner(&self, key: &str) -> Result<(), SnapshotError> {
        if self.layout_id.is_empty() || self.layout_id == key {
            Ok(())
        } else {
            Err(SnapshotError::ForeignLayout {
                expected: key.to_owned(),
                found: self.layout_id.clone(),
            })
        }
    }
}

/// Errors from encoding, decoding, or validating a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    Serialize(serde_json::Error),
    Deserialize(serde_json::Error),
    /// Written by a newer schema than this build understands.
    UnsupportedVersion { found: u16, expected: u16 },
    /// No migration path from an older schema.
    NoMigrationPath { from: u16, to: u16 },
    DuplicatePanelId { id: PanelId },
    /// Stored under `expected` but written for layout `found`.
    ForeignLayout { expected: String, found: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(e) => write!(f, "failed to serialize layout snapshot: {e}"),
            Self::Deserialize(e) => write!(f, "failed to parse layout snapshot: {e}"),
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported layout schema version {found} (expected {expected})"
            ),
            Self::NoMigrationPath { from, to } => {
                write!(f, "no migration path from v{from} to v{to}")
            }
            Self::DuplicatePanelId { id } => {
                write!(f, "snapshot contains duplicate panel id \"{id}\"")
            }
            Self::ForeignLayout { expected, found } => write!(
                f,
                "snapshot belongs to layout \"{found}\", not \"{expected}\""
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(e) | Self::Deserialize(e) => Some(e),
            _ => None,
        }
    }
}

/// Bring a snapshot to [`LAYOUT_SCHEMA_VERSION`]. Identity for v1.
pub fn migrate(snapshot: LayoutSnapshot) -> Result<LayoutSnapshot, SnapshotError> {
    match snapshot.schema_version {
        LAYOUT_SCHEMA_VERSION => Ok(snapshot),
        v if v > LAYOUT_SCHEMA_VERSION => Err(SnapshotError::UnsupportedVersion {
            found: v,
            expected: LAYOUT_SCHEMA_VERSION,
        }),
        v => Err(SnapshotError::NoMigrationPath {
            from: v,
            to: LAYOUT_SCHEMA_VERSION,
        }),
    }
}

/// A repair applied while sanitizing a loaded state.
#[derive(Debug, Clone, PartialEq)]
pub enum SanitizeNote {
    ClearedDanglingFullscreen { id: PanelId },
    ClampedGeometry { id: PanelId },
}

/// Validate and repair a state loaded from storage.
pub fn sanitize(
    state: LayoutState,
    bounds: PercentBounds,
) -> Result<(LayoutState, Vec<SanitizeNote>), SnapshotError> {
    let mut seen = FxHashSet::default();
    for panel in state.panels.iter() {
        if !seen.insert(panel.id.as_str()) {
            return Err(SnapshotError::DuplicatePanelId {
                id: panel.id.clone(),
            });
        }
    }

    let mut notes = Vec::new();
    let panels = state.panels.map(|panel| {
        let clamped = clamp_panel(panel, bounds);
        if clamped != *panel {
            notes.push(SanitizeNote::ClampedGeometry {
                id: panel.id.clone(),
            });
        }
        clamped
    });

    let mut fullscreen_panel_id = state.fullscreen_panel_id.clone();
    if let Some(id) = &state.fullscreen_panel_id
        && !panels.contains(id)
    {
        notes.push(SanitizeNote::ClearedDanglingFullscreen { id: id.clone() });
        fullscreen_panel_id = None;
    }

    Ok((
        LayoutState {
            panels,
            fullscreen_panel_id,
            ..state
        },
        notes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelDescriptor;
    use crate::registry::PanelRegistry;

    fn sample_state() -> LayoutState {
        let mut state = LayoutState::new(
            PanelRegistry::from_panels([
                PanelDescriptor::new("chart", "Chart").with_size(60.0, 70.0),
                PanelDescriptor::new("orders", "Orders").with_collapsed(true),
            ])
            .unwrap(),
        );
        state.fullscreen_panel_id = Some("chart".into());
        state.sidebar_collapsed = true;
        state
    }

    #[test]
    fn encode_decode_round_trip() {
        let snapshot = LayoutSnapshot::new("trading", sample_state());
        let raw = snapshot.encode().unwrap();
        assert_eq!(LayoutSnapshot::decode(&raw).unwrap(), snapshot);
    }

    #[test]
    fn decode_accepts_minimal_snapshot() {
        let snapshot = LayoutSnapshot::decode(r#"{"state":{}}"#).unwrap();
        assert_eq!(snapshot.schema_version, LAYOUT_SCHEMA_VERSION);
        assert_eq!(snapshot.state, LayoutState::default());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let err = LayoutSnapshot::decode(r#"{"schema_version":9,"state":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion {
                found: 9,
                expected: LAYOUT_SCHEMA_VERSION
            }
        ));
    }

    #[test]
    fn older_schema_has_no_migration_path() {
        let err = LayoutSnapshot::decode(r#"{"schema_version":0,"state":{}}"#).unwrap_err();
        assert_eq!(err.to_string(), "no migration path from v0 to v1");
    }

    #[test]
    fn garbage_is_a_deserialize_error() {
        let err = LayoutSnapshot::decode("not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Deserialize(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn sanitize_rejects_duplicate_ids() {
        let raw = r#"{"state":{"panels":[{"id":"a"},{"id":"a"}]}}"#;
        let snapshot = LayoutSnapshot::decode(raw).unwrap();
        let err = sanitize(snapshot.state, PercentBounds::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicatePanelId { .. }));
    }

    #[test]
    fn sanitize_repairs_dangling_fullscreen_and_geometry() {
        let raw = r#"{"state":{"panels":[{"id":"a","width":99}],"fullscreen_panel_id":"gone"}}"#;
        let snapshot = LayoutSnapshot::decode(raw).unwrap();
        let (state, notes) = sanitize(snapshot.state, PercentBounds::default()).unwrap();
        assert_eq!(state.fullscreen_panel_id(), None);
        assert_eq!(state.panel(&"a".into()).unwrap().width, 90.0);
        assert_eq!(
            notes,
            [
                SanitizeNote::ClampedGeometry { id: "a".into() },
                SanitizeNote::ClearedDanglingFullscreen { id: "gone".into() },
            ]
        );
    }

    #[test]
    fn sanitize_is_identity_on_valid_state() {
        let state = sample_state();
        let (clean, notes) = sanitize(state.clone(), PercentBounds::default()).unwrap();
        assert_eq!(clean, state);
        assert!(notes.is_empty());
    }
}
