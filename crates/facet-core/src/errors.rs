//! # Error Types
//!
//! All error taxonomies for the facet core, one enum per concern:
//!
//! - [`GateError`]: authorization failures. Terminal for the call and
//!   never auto-retried.
//! - [`CutError`]: batch validation and init-hook failures. Any variant
//!   aborts the entire batch; no partial commit under any circumstance.
//! - [`DispatchError`]: routing failures and verbatim module failures.
//!   `FunctionNotFound` is not fatal to the system; it means the
//!   capability simply is not registered and is safe to retry after an
//!   upgrade.
//! - [`ModuleError`]: what a module's own logic returns. The router
//!   propagates these unmodified.
//!
//! Batch errors carry the offending operation's index, selector, and
//! action so an operator can diagnose the abort without replaying state.

use crate::domain::entities::CutAction;
use crate::domain::value_objects::{Address, Selector};
use thiserror::Error;

// =============================================================================
// GATE ERRORS
// =============================================================================

/// Authorization failures from the access gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The caller is not the registry authority.
    #[error("unauthorized caller: {caller:?}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Transferring authority to the null address would lock the gate.
    #[error("authority cannot be the null address")]
    NullAuthority,
}

// =============================================================================
// CUT ERRORS
// =============================================================================

/// Failures that abort a cut batch.
///
/// Validation stops at the first violation; nothing from any operation
/// in the batch is retained.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CutError {
    /// The caller failed the access gate before any validation ran.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// The batch contains no operations.
    #[error("cut batch is empty")]
    EmptyBatch,

    /// The batch exceeds the configured operation limit.
    #[error("cut batch has {ops} operations, limit is {max}")]
    BatchTooLarge {
        /// Operations in the submitted batch.
        ops: usize,
        /// Configured maximum.
        max: usize,
    },

    /// An operation's selector list is empty.
    #[error("operation {index}: selector list is empty")]
    EmptySelectorList {
        /// Index of the offending operation.
        index: usize,
    },

    /// An operation's selector list exceeds the configured limit.
    #[error("operation {index}: {len} selectors, limit is {max}")]
    SelectorListTooLong {
        /// Index of the offending operation.
        index: usize,
        /// Selectors in the operation.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Add requires the selector to be currently unmapped.
    #[error("operation {index} (Add): selector {selector} is already mapped")]
    SelectorAlreadyMapped {
        /// Index of the offending operation.
        index: usize,
        /// The already-mapped selector.
        selector: Selector,
    },

    /// Replace and Remove require the selector to be currently mapped.
    #[error("operation {index} ({action}): selector {selector} is not mapped")]
    SelectorNotMapped {
        /// Index of the offending operation.
        index: usize,
        /// The unmapped selector.
        selector: Selector,
        /// Whether the operation was a Replace or a Remove.
        action: CutAction,
    },

    /// Replace requires a module different from the current mapping.
    #[error("operation {index} (Replace): selector {selector} already routes to {module:?}")]
    SameModuleReplace {
        /// Index of the offending operation.
        index: usize,
        /// The selector whose mapping would not change.
        selector: Selector,
        /// The module already mapped.
        module: Address,
    },

    /// Add and Replace require a module known to contain executable code.
    #[error("operation {index} ({action}): module {module:?} has no code")]
    ModuleHasNoCode {
        /// Index of the offending operation.
        index: usize,
        /// The codeless module handle.
        module: Address,
        /// Whether the operation was an Add or a Replace.
        action: CutAction,
    },

    /// Remove operations must carry the null module handle.
    #[error("operation {index} (Remove): module handle must be null, got {module:?}")]
    RemoveTargetMustBeNull {
        /// Index of the offending operation.
        index: usize,
        /// The non-null handle that was supplied.
        module: Address,
    },

    /// The supplied init module has no executable code.
    #[error("init module {module:?} has no code")]
    InitModuleHasNoCode {
        /// The codeless init module handle.
        module: Address,
    },

    /// The init payload exceeds the configured limit.
    #[error("init payload is {len} bytes, limit is {max}")]
    PayloadTooLarge {
        /// Payload length in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The init hook failed; the whole batch was rolled back.
    #[error("init hook on {module:?} failed: {reason}")]
    InitHookFailed {
        /// The init module that failed.
        module: Address,
        /// The module's failure, rendered.
        reason: String,
    },
}

// =============================================================================
// DISPATCH ERRORS
// =============================================================================

/// Failures surfaced by the call router.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No module is currently mapped for the selector.
    #[error("no module mapped for selector {0}")]
    FunctionNotFound(Selector),

    /// The registry maps the selector, but the host no longer has the
    /// module's executable logic.
    #[error("module {0:?} has no executable code")]
    ModuleHasNoCode(Address),

    /// The module itself failed. Propagated verbatim; the router never
    /// reinterprets, wraps, or hides a module's failure.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

// =============================================================================
// MODULE ERRORS
// =============================================================================

/// Failures a module's own logic may return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// The module deliberately reverted.
    #[error("module reverted: {0}")]
    Revert(String),

    /// The module hit an internal failure.
    #[error("module failure: {0}")]
    Internal(String),
}

// =============================================================================
// TESTS
// =============================================================================
