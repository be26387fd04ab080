#![forbid(unsafe_code)]

//! Ordered panel collection with replace-by-id semantics.
//!
//! Every operation borrows the current registry and returns a new one; the
//! receiver is never modified. Failed operations return an error and leave
//! the caller holding the untouched original, so a registry error can never
//! produce a partial mutation.
//!
//! # Invariants
//!
//! 1. Panel ids are unique.
//! 2. Order is insertion order; `update` keeps a panel at its index.
//! 3. Geometry is stored exactly as given (clamping belongs to the engine).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::panel::{PanelDescriptor, PanelId, PanelPatch};

/// Errors from registry-level and engine-level panel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A panel with this id is already registered.
    DuplicateId { id: PanelId },
    /// No panel with this id is registered.
    NotFound { id: PanelId },
    /// The close affordance was used on a panel that is not closable.
    NotClosable { id: PanelId },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "panel id \"{id}\" is already registered"),
            Self::NotFound { id } => write!(f, "panel \"{id}\" not found"),
            Self::NotClosable { id } => write!(f, "panel \"{id}\" is not closable"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The ordered collection of panel descriptors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelRegistry {
    panels: Vec<PanelDescriptor>,
}

impl PanelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a panel set, rejecting duplicate ids.
    pub fn from_panels(
        panels: impl IntoIterator<Item = PanelDescriptor>,
    ) -> Result<Self, LayoutError> {
        panels
            .into_iter()
            .try_fold(Self::new(), |registry, panel| registry.add(panel))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelDescriptor> {
        self.panels.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PanelDescriptor] {
        &self.panels
    }

    #[must_use]
    pub fn get(&self, id: &PanelId) -> Option<&PanelDescriptor> {
        self.panels.iter().find(|panel| &panel.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PanelId) -> bool {
        self.get(id).is_some()
    }

    fn position(&self, id: &PanelId) -> Result<usize, LayoutError> {
        self.panels
            .iter()
            .position(|panel| &panel.id == id)
            .ok_or_else(|| LayoutError::NotFound { id: id.clone() })
    }

    /// Append a panel.
    pub fn add(&self, descriptor: PanelDescriptor) -> Result<Self, LayoutError> {
        if self.contains(&descriptor.id) {
            return Err(LayoutError::DuplicateId { id: descriptor.id });
        }
        let mut panels = self.panels.clone();
        panels.push(descriptor);
        Ok(Self { panels })
    }

    /// Remove a panel, returning the new registry and the removed descriptor.
    pub fn remove(&self, id: &PanelId) -> Result<(Self, PanelDescriptor), LayoutError> {
        let index = self.position(id)?;
        let mut panels = self.panels.clone();
        let removed = panels.remove(index);
        Ok((Self { panels }, removed))
    }

    /// Merge `patch` into the panel with `id`.
    pub fn update(&self, id: &PanelId, patch: &PanelPatch) -> Result<Self, LayoutError> {
        let index = self.position(id)?;
        let replacement = patch.merged_into(&self.panels[index]);
        Ok(self.replace_at(index, replacement))
    }

    /// Flip the `collapsed` flag of the panel with `id`.
    pub fn toggle_collapsed(&self, id: &PanelId) -> Result<Self, LayoutError> {
        let index = self.position(id)?;
        let mut replacement = self.panels[index].clone();
        replacement.collapsed = !replacement.collapsed;
        Ok(self.replace_at(index, replacement))
    }

    /// Apply `f` to every descriptor, producing a new registry.
    #[must_use]
    pub fn map(&self, f: impl FnMut(&PanelDescriptor) -> PanelDescriptor) -> Self {
        Self {
            panels: self.panels.iter().map(f).collect(),
        }
    }

    fn replace_at(&self, index: usize, replacement: PanelDescriptor) -> Self {
        let mut panels = self.panels.clone();
        panels[index] = replacement;
        Self { panels }
    }
}
