//! # Shared Storage Arena
//!
//! One persistent state container shared by every installed module. Each
//! module's fields live behind a constant, collision-resistant
//! [`NamespaceKey`], so unrelated modules can never alias each other's
//! slots: an arena-plus-index design rather than ad-hoc shared globals.
//!
//! The arena is pure data. Snapshot/commit semantics (run a call against a
//! copy, swap on success) are imposed by the service layer; cloning the
//! arena is the snapshot.

use crate::domain::value_objects::{NamespaceKey, StorageKey, StorageValue};
use std::collections::HashMap;

/// The shared persistent state of the entry point.
///
/// Slots are 32-byte words addressed by `(NamespaceKey, StorageKey)`.
/// Writing the zero value clears a slot, so an untouched arena and an
/// arena whose writes were all reverted compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageArena {
    /// Per-namespace slot tables.
    namespaces: HashMap<NamespaceKey, HashMap<StorageKey, StorageValue>>,
}

impl StorageArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a slot. Never-written slots read as zero.
    #[must_use]
    pub fn read(&self, namespace: NamespaceKey, key: StorageKey) -> StorageValue {
        self.namespaces
            .get(&namespace)
            .and_then(|slots| slots.get(&key))
            .copied()
            .unwrap_or(StorageValue::ZERO)
    }

    /// Writes a slot. Writing zero clears the slot.
    pub fn write(&mut self, namespace: NamespaceKey, key: StorageKey, value: StorageValue) {
        if value.is_zero() {
            if let Some(slots) = self.namespaces.get_mut(&namespace) {
                slots.remove(&key);
                if slots.is_empty() {
                    self.namespaces.remove(&namespace);
                }
            }
        } else {
            self.namespaces.entry(namespace).or_default().insert(key, value);
        }
    }

    /// Number of occupied slots in a namespace.
    #[must_use]
    pub fn namespace_len(&self, namespace: NamespaceKey) -> usize {
        self.namespaces.get(&namespace).map_or(0, HashMap::len)
    }

    /// Returns true if no slot in any namespace is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Namespaces that currently hold at least one occupied slot.
    #[must_use]
    pub fn occupied_namespaces(&self) -> Vec<NamespaceKey> {
        self.namespaces.keys().copied().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
