//! # Facet Core - Dynamic Module Dispatch & Upgrade Registry
//!
//! ## Purpose
//!
//! One stable entry point that routes calls to independently deployed
//! modules (facets) by a fixed-width call selector, and that changes the
//! installed module set atomically, under strict collision rules,
//! without redeploying the entry point or disturbing unrelated modules'
//! state. Business modules (token factories, exchange, staking, and the
//! rest) register with, and are invoked through, this core.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Each selector maps to at most one module | `domain/registry.rs` primary table |
//! | INVARIANT-2 | Add requires the selector unmapped | `domain/registry.rs` - `apply_op()` |
//! | INVARIANT-3 | Replace requires a different current module | `domain/registry.rs` - `apply_op()` |
//! | INVARIANT-4 | Remove requires the selector mapped, null handle | `domain/registry.rs` - `apply_op()` |
//! | INVARIANT-5 | A batch commits fully or not at all | `service.rs` copy-validate-swap |
//! | INVARIANT-6 | Module storage namespaces never overlap | `domain/arena.rs` keyed partitions |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Registry Store | `domain/registry.rs` | Selector table + ordered facet index |
//! | Call Router | `service.rs` (`Dispatcher`) | Shared-context execution, verbatim results |
//! | Cut Processor | `service.rs` (`CutSubmission`) | Atomic Add/Replace/Remove batches |
//! | Access Gate | `service.rs` | Single transferable authority |
//! | Init Hook | `service.rs` | One-shot migration inside the commit |
//! | Loupe | `service.rs` (`Loupe`) | Committed-state introspection |
//!
//! ## Concurrency
//!
//! Strictly serialized: one dispatch or cut runs to completion before
//! the next touches the same state cell. The service wraps the cell in a
//! single `RwLock`, so embeddings with genuinely parallel callers keep
//! validate+apply inside one critical section.
//!
//! ## Usage Example
//!
//! ```ignore
//! use facet_core::prelude::*;
//!
//! let service = create_test_service(operator);
//! service.host().register_fn(module, |ctx, payload| { /* ... */ Ok(Bytes::new()) });
//!
//! service.submit_cut(operator, vec![CutOp::add(module, selectors)], None).await?;
//! let out = service.dispatch(caller, selector, payload).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Value objects
    pub use crate::domain::value_objects::{
        Address, Bytes, Hash, NamespaceKey, Selector, StorageKey, StorageValue, U256,
    };

    // Entities
    pub use crate::domain::entities::{CallContext, CutAction, CutOp, CutPhase, Facet};

    // Storage arena
    pub use crate::domain::arena::StorageArena;

    // Registry store
    pub use crate::domain::registry::FacetRegistry;

    // Domain services
    pub use crate::domain::services::{keccak256, namespace_key, selector_from_signature};

    // Invariants
    pub use crate::domain::invariants::{
        check_registry_invariants, registry_is_consistent, InvariantCheckResult,
        RegistryViolation,
    };

    // Ports
    pub use crate::ports::inbound::{CutReceipt, CutSubmission, Dispatcher, InitCall, Loupe};
    pub use crate::ports::outbound::{CutEventSink, ModuleHost, ModuleLogic};

    // Events
    pub use crate::events::{
        topics, AuthorityTransferredPayload, CutCommittedPayload, CutOpRecord,
    };

    // Errors
    pub use crate::errors::{CutError, DispatchError, GateError, ModuleError};

    // Adapters
    pub use crate::adapters::{
        FnModule, InMemoryModuleHost, RecordingEventSink, TracingEventSink,
    };

    // Service
    pub use crate::service::{
        create_test_service, FacetCoreService, ServiceConfig, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
