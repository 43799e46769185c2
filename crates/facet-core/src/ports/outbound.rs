//! # Driven Ports (SPI - Outbound)
//!
//! The interfaces the facet core depends on. Adapters implement these
//! to provide module executables and event delivery; dependencies point
//! inward, never the other way.

use crate::domain::entities::CallContext;
use crate::domain::value_objects::{Address, Bytes};
use crate::errors::ModuleError;
use crate::events::{AuthorityTransferredPayload, CutCommittedPayload};
use std::sync::Arc;

// =============================================================================
// MODULE LOGIC (the executable unit behind a handle)
// =============================================================================

/// Executable logic of one deployed module.
///
/// Invoked by the router in the shared execution context: the logic runs
/// as if it were the entry point's own code, reading and writing the
/// entry point's storage arena through the context and presenting the
/// entry point's identity. Return data and failures pass through the
/// router unmodified.
pub trait ModuleLogic: Send + Sync {
    /// Executes the module for one routed call (or init-hook invocation).
    ///
    /// # Errors
    ///
    /// Any [`ModuleError`]; every storage effect of the failed call is
    /// unwound by the router.
    fn invoke(&self, ctx: &mut CallContext<'_>, payload: &[u8]) -> Result<Bytes, ModuleError>;
}

// =============================================================================
// MODULE HOST (code resolution)
// =============================================================================

/// Resolves module handles to their executable logic.
///
/// Modules are deployed out-of-band; the host is the core's only window
/// onto them. The cut processor uses [`ModuleHost::has_code`] to enforce
/// that Add/Replace targets contain executable code.
pub trait ModuleHost: Send + Sync {
    /// The logic deployed at the handle, if any.
    fn logic(&self, module: Address) -> Option<Arc<dyn ModuleLogic>>;

    /// Whether the handle is known to contain executable code.
    fn has_code(&self, module: Address) -> bool {
        self.logic(module).is_some()
    }
}

// =============================================================================
// CUT EVENT SINK (off-chain observers)
// =============================================================================

/// Receives one event per committed registry change.
///
/// Sinks observe committed state only; an aborted batch reaches no sink.
pub trait CutEventSink: Send + Sync {
    /// A cut batch committed.
    fn cut_committed(&self, payload: &CutCommittedPayload);

    /// The gate's authority changed hands.
    fn authority_transferred(&self, payload: &AuthorityTransferredPayload);
}

// =============================================================================
// TESTS
// =============================================================================
