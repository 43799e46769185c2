//! # Driving Ports (API - Inbound)
//!
//! The interfaces the facet core exposes at its boundary. Callers
//! (external transactions, operator tooling, auditors) drive the system
//! exclusively through these traits.

use crate::domain::entities::{CutOp, Facet};
use crate::domain::value_objects::{Address, Bytes, Selector};
use crate::errors::{CutError, DispatchError, GateError};
use async_trait::async_trait;
use uuid::Uuid;

// =============================================================================
// INIT CALL & CUT RECEIPT (API types)
// =============================================================================

/// Optional one-shot migration routine attached to a cut submission.
///
/// Invoked exactly once per committed batch, inside the same atomic
/// unit; if it fails, the whole batch is rolled back as though nothing
/// happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitCall {
    /// Module whose logic performs the migration.
    pub module: Address,
    /// Opaque payload handed to the init logic.
    pub payload: Bytes,
}

impl InitCall {
    /// Creates an init call.
    #[must_use]
    pub fn new(module: Address, payload: Bytes) -> Self {
        Self { module, payload }
    }
}

/// Returned to the submitter when a cut batch commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutReceipt {
    /// Identifier assigned to the committed batch.
    pub batch_id: Uuid,
    /// The operations that took effect, in application order.
    pub operations: Vec<CutOp>,
}

// =============================================================================
// DISPATCHER (Primary Driving Port)
// =============================================================================

/// Routes incoming calls to the responsible module.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Resolves the module, then executes its logic in the shared
    /// execution context of the entry point. Output or failure returns
    /// to the caller verbatim.
    ///
    /// Dispatch never mutates the registry; a failing module call
    /// unwinds every storage effect it made.
    ///
    /// # Errors
    ///
    /// * [`DispatchError::FunctionNotFound`]: selector is unmapped.
    /// * [`DispatchError::ModuleHasNoCode`]: the host lost the module.
    /// * [`DispatchError::Module`]: the module failed; verbatim.
    async fn dispatch(
        &self,
        caller: Address,
        selector: Selector,
        payload: Bytes,
    ) -> Result<Bytes, DispatchError>;

    /// Pure lookup against the latest committed state.
    async fn resolve(&self, selector: Selector) -> Option<Address>;
}

// =============================================================================
// CUT SUBMISSION (Upgrade Port)
// =============================================================================

/// Submits registry-mutating batches through the access gate.
#[async_trait]
pub trait CutSubmission: Send + Sync {
    /// Validates and applies a batch as one atomic unit, optionally
    /// running a one-shot init hook inside the same unit.
    ///
    /// # Errors
    ///
    /// * [`CutError::Gate`]: the caller is not the authority; rejected
    ///   before any validation.
    /// * Any batch-validation variant: the entire batch aborts with the
    ///   offending operation's index, selector, and action; no mutation
    ///   is retained.
    /// * [`CutError::InitHookFailed`]: the hook failed after apply; the
    ///   batch was rolled back.
    async fn submit_cut(
        &self,
        caller: Address,
        batch: Vec<CutOp>,
        init: Option<InitCall>,
    ) -> Result<CutReceipt, CutError>;

    /// Transfers the gate's authority to a new holder. Gated itself, and
    /// never performed by direct field mutation, so the gate cannot be
    /// locked out by accident.
    ///
    /// # Errors
    ///
    /// * [`GateError::Unauthorized`]: caller is not the authority.
    /// * [`GateError::NullAuthority`]: the new holder is null.
    async fn transfer_authority(
        &self,
        caller: Address,
        new_authority: Address,
    ) -> Result<(), GateError>;

    /// The current authority.
    async fn authority(&self) -> Address;
}

// =============================================================================
// LOUPE (Introspection Port)
// =============================================================================

/// Read-only, side-effect-free queries over the latest committed
/// registry state. Never reflects a pending or in-flight batch.
#[async_trait]
pub trait Loupe: Send + Sync {
    /// Distinct modules reachable through at least one selector, in
    /// stable first-registration order.
    async fn facet_addresses(&self) -> Vec<Address>;

    /// Selectors currently mapped to the module.
    async fn facet_function_selectors(&self, module: Address) -> Vec<Selector>;

    /// Current module for the selector, if any.
    async fn facet_address(&self, selector: Selector) -> Option<Address>;

    /// The combined view: every reachable module with its selectors.
    async fn facets(&self) -> Vec<Facet>;
}

// =============================================================================
// TESTS
// =============================================================================
