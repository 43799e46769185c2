//! # Core Domain Entities
//!
//! Main business entities for registry upgrades and module dispatch:
//! cut operations, the cut-processor state machine phases, the loupe view
//! of an installed facet, and the shared execution context handed to a
//! module while it runs with the entry point's own identity and storage.

use crate::domain::arena::StorageArena;
use crate::domain::value_objects::{Address, NamespaceKey, Selector, StorageKey, StorageValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CUT OPERATIONS
// =============================================================================

/// Kind of a registry-mutating operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutAction {
    /// Map currently unmapped selectors to a module.
    Add,
    /// Remap selectors from their current module to a different one.
    Replace,
    /// Unmap currently mapped selectors. The operation's module handle
    /// must be the null address.
    Remove,
}

impl fmt::Display for CutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "Add",
            Self::Replace => "Replace",
            Self::Remove => "Remove",
        };
        f.write_str(name)
    }
}

/// A single registry-mutating operation within a cut batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutOp {
    /// What the operation does to its selectors.
    pub action: CutAction,
    /// Target module handle. Null for Remove, a deployed module otherwise.
    pub module: Address,
    /// The selectors the operation covers. Must be non-empty.
    pub selectors: Vec<Selector>,
}

impl CutOp {
    /// Builds an Add operation.
    #[must_use]
    pub fn add(module: Address, selectors: Vec<Selector>) -> Self {
        Self {
            action: CutAction::Add,
            module,
            selectors,
        }
    }

    /// Builds a Replace operation.
    #[must_use]
    pub fn replace(module: Address, selectors: Vec<Selector>) -> Self {
        Self {
            action: CutAction::Replace,
            module,
            selectors,
        }
    }

    /// Builds a Remove operation. The module handle is the null address.
    #[must_use]
    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            action: CutAction::Remove,
            module: Address::ZERO,
            selectors,
        }
    }
}

// =============================================================================
// CUT PROCESSOR PHASES
// =============================================================================

/// Phases of the cut processor.
///
/// A submission moves `Idle -> Validating -> Applying`, then ends in
/// either `Committed` or `Aborted`. Partially applied batches are never
/// observable in any phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutPhase {
    /// No submission in flight.
    Idle,
    /// Operations are being checked left-to-right against the working view.
    Validating,
    /// The validated batch (and init hook, if any) is being applied.
    Applying,
    /// The batch took effect as one unit.
    Committed,
    /// Nothing from the batch was retained.
    Aborted,
}

impl fmt::Display for CutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Validating => "Validating",
            Self::Applying => "Applying",
            Self::Committed => "Committed",
            Self::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}

// =============================================================================
// FACET (loupe view / reverse-index entry)
// =============================================================================

/// A module together with the selectors currently routed to it.
///
/// Also the reverse-index entry kept by the registry store; entries stay
/// in stable first-registration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// The module handle.
    pub module: Address,
    /// Selectors currently mapped to the module, in mapping order.
    pub selectors: Vec<Selector>,
}

impl Facet {
    /// Creates a facet entry for a module with no selectors yet.
    #[must_use]
    pub fn new(module: Address) -> Self {
        Self {
            module,
            selectors: Vec::new(),
        }
    }
}

// =============================================================================
// CALL CONTEXT (shared execution context)
// =============================================================================

/// The shared execution context a module runs in.
///
/// The module's code executes as if it were the entry point's own code:
/// it sees the entry point's address as the executing identity (`core`),
/// the original caller unchanged, and reads and writes the entry point's
/// persistent storage arena through namespaced slots.
///
/// Init-hook invocations carry [`Selector::ZERO`], since they are not
/// routed through the registry.
pub struct CallContext<'a> {
    /// The entry point's own address: the identity the module presents.
    pub core: Address,
    /// The original external caller. Never rewritten by the router.
    pub caller: Address,
    /// The module whose logic is executing.
    pub module: Address,
    /// The routed selector, or [`Selector::ZERO`] for init hooks.
    pub selector: Selector,
    arena: &'a mut StorageArena,
}

impl<'a> CallContext<'a> {
    /// Creates a context over the given arena.
    pub fn new(
        core: Address,
        caller: Address,
        module: Address,
        selector: Selector,
        arena: &'a mut StorageArena,
    ) -> Self {
        Self {
            core,
            caller,
            module,
            selector,
            arena,
        }
    }

    /// Reads a slot from the shared arena.
    #[must_use]
    pub fn read(&self, namespace: NamespaceKey, key: StorageKey) -> StorageValue {
        self.arena.read(namespace, key)
    }

    /// Writes a slot in the shared arena.
    pub fn write(&mut self, namespace: NamespaceKey, key: StorageKey, value: StorageValue) {
        self.arena.write(namespace, key, value);
    }
}

// =============================================================================
// TESTS
// =============================================================================
