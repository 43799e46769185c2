//! # Facet Core Service
//!
//! The stable entry point: access gate, cut processor, call router, and
//! loupe over one shared state cell. The service owns the only mutable
//! shared resource in the core (registry plus storage arena) behind a
//! single `RwLock`, giving the mutual-exclusion critical section the
//! concurrency model requires when callers are parallel.
//!
//! Every operation is run-to-completion: it either finishes, or fails
//! with all of its effects unwound. Dispatch and cut submission take the
//! write half; resolve and loupe queries take the read half and only
//! ever observe committed state.

use crate::domain::arena::StorageArena;
use crate::domain::entities::{CallContext, CutOp, CutPhase, Facet};
use crate::domain::invariants::registry_is_consistent;
use crate::domain::registry::FacetRegistry;
use crate::domain::value_objects::{Address, Bytes, Selector};
use crate::errors::{CutError, DispatchError, GateError};
use crate::events::{AuthorityTransferredPayload, CutCommittedPayload, CutOpRecord};
use crate::ports::inbound::{CutReceipt, CutSubmission, Dispatcher, InitCall, Loupe};
use crate::ports::outbound::{CutEventSink, ModuleHost};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// The entry point's own address: the identity every module presents
    /// while executing in the shared context.
    pub core_address: Address,
    /// Maximum operations accepted in one cut batch.
    pub max_ops_per_batch: usize,
    /// Maximum selectors accepted in one operation.
    pub max_selectors_per_op: usize,
    /// Maximum init payload size in bytes.
    pub max_init_payload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            core_address: Address::ZERO,
            max_ops_per_batch: 128,
            max_selectors_per_op: 256,
            max_init_payload_bytes: 64 * 1024,
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Counters maintained by the service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Dispatches that returned module output.
    pub dispatches_executed: u64,
    /// Dispatches that failed (unmapped selector, missing code, or a
    /// module failure).
    pub dispatch_failures: u64,
    /// Cut batches committed.
    pub cuts_committed: u64,
    /// Cut batches aborted during validation, apply, or init.
    pub cuts_aborted: u64,
    /// Submissions rejected by the access gate.
    pub rejected_submissions: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// Committed state of the entry point: routing, storage, authority.
struct CoreState {
    registry: FacetRegistry,
    arena: StorageArena,
    authority: Address,
}

/// The facet core service.
///
/// Generic over the module host that resolves executables and the sink
/// that receives committed-change events.
pub struct FacetCoreService<H: ModuleHost, E: CutEventSink> {
    /// Service configuration.
    config: ServiceConfig,
    /// Module host adapter.
    host: Arc<H>,
    /// Event sink adapter.
    events: Arc<E>,
    /// The single shared state cell.
    state: Arc<RwLock<CoreState>>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<H: ModuleHost, E: CutEventSink> FacetCoreService<H, E> {
    /// Creates a service with an empty registry and arena. `authority`
    /// is the genesis holder of the access gate.
    pub fn new(host: Arc<H>, events: Arc<E>, authority: Address, config: ServiceConfig) -> Self {
        Self {
            config,
            host,
            events,
            state: Arc::new(RwLock::new(CoreState {
                registry: FacetRegistry::new(),
                arena: StorageArena::new(),
                authority,
            })),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// The module host this service resolves executables from.
    pub fn host(&self) -> Arc<H> {
        Arc::clone(&self.host)
    }

    /// The event sink this service publishes to.
    pub fn events(&self) -> Arc<E> {
        Arc::clone(&self.events)
    }

    /// Checks the submitted batch against configured size limits.
    fn check_limits(&self, batch: &[CutOp], init: Option<&InitCall>) -> Result<(), CutError> {
        if batch.is_empty() {
            return Err(CutError::EmptyBatch);
        }
        if batch.len() > self.config.max_ops_per_batch {
            return Err(CutError::BatchTooLarge {
                ops: batch.len(),
                max: self.config.max_ops_per_batch,
            });
        }
        for (index, op) in batch.iter().enumerate() {
            if op.selectors.len() > self.config.max_selectors_per_op {
                return Err(CutError::SelectorListTooLong {
                    index,
                    len: op.selectors.len(),
                    max: self.config.max_selectors_per_op,
                });
            }
        }
        if let Some(init) = init {
            if init.payload.len() > self.config.max_init_payload_bytes {
                return Err(CutError::PayloadTooLarge {
                    len: init.payload.len(),
                    max: self.config.max_init_payload_bytes,
                });
            }
        }
        Ok(())
    }

    /// Runs the init hook against the speculative arena. The registry
    /// swap and this invocation form one atomic unit: any failure here
    /// discards everything.
    fn run_init_hook(
        &self,
        caller: Address,
        init: &InitCall,
        arena: &mut StorageArena,
    ) -> Result<(), CutError> {
        let logic = self
            .host
            .logic(init.module)
            .ok_or(CutError::InitModuleHasNoCode {
                module: init.module,
            })?;

        let mut ctx = CallContext::new(
            self.config.core_address,
            caller,
            init.module,
            Selector::ZERO,
            arena,
        );
        logic
            .invoke(&mut ctx, init.payload.as_slice())
            .map_err(|err| CutError::InitHookFailed {
                module: init.module,
                reason: err.to_string(),
            })?;
        Ok(())
    }

    async fn note_cut_aborted(&self) {
        self.stats.write().await.cuts_aborted += 1;
    }

    async fn note_dispatch_failure(&self) {
        self.stats.write().await.dispatch_failures += 1;
    }
}

// =============================================================================
// CUT SUBMISSION (access gate + cut processor)
// =============================================================================

#[async_trait]
impl<H: ModuleHost, E: CutEventSink> CutSubmission for FacetCoreService<H, E> {
    #[instrument(skip(self, batch, init), fields(caller = %caller, ops = batch.len()))]
    async fn submit_cut(
        &self,
        caller: Address,
        batch: Vec<CutOp>,
        init: Option<InitCall>,
    ) -> Result<CutReceipt, CutError> {
        let mut state = self.state.write().await;

        // Access gate: rejected callers fail before any validation.
        if caller != state.authority {
            warn!(caller = %caller, "unauthorized cut submission");
            self.stats.write().await.rejected_submissions += 1;
            return Err(GateError::Unauthorized { caller }.into());
        }

        debug!(phase = %CutPhase::Validating, "validating cut batch");
        if let Err(err) = self.check_limits(&batch, init.as_ref()) {
            warn!(error = %err, "cut batch rejected");
            self.note_cut_aborted().await;
            return Err(err);
        }

        // Validate and apply on a working copy; the committed registry
        // is untouched until the swap below.
        let next_registry = match state
            .registry
            .apply_batch(&batch, |module| self.host.has_code(module))
        {
            Ok(next) => next,
            Err(err) => {
                warn!(phase = %CutPhase::Aborted, error = %err, "cut batch aborted");
                self.note_cut_aborted().await;
                return Err(err);
            }
        };

        debug!(phase = %CutPhase::Applying, "applying cut batch");

        // The init hook runs against a snapshot of the arena so that a
        // failing hook leaves no trace.
        let mut next_arena = state.arena.clone();
        if let Some(init) = &init {
            if let Err(err) = self.run_init_hook(caller, init, &mut next_arena) {
                warn!(phase = %CutPhase::Aborted, error = %err, "init hook aborted cut batch");
                self.note_cut_aborted().await;
                return Err(err);
            }
        }

        // Commit: both structures and the arena swap in one step.
        state.registry = next_registry;
        state.arena = next_arena;
        debug_assert!(registry_is_consistent(&state.registry));

        let batch_id = Uuid::new_v4();
        let payload = CutCommittedPayload {
            batch_id,
            operations: batch.iter().map(CutOpRecord::from).collect(),
            init_module: init.as_ref().map(|call| call.module),
        };
        self.events.cut_committed(&payload);

        self.stats.write().await.cuts_committed += 1;
        info!(
            phase = %CutPhase::Committed,
            batch_id = %batch_id,
            ops = batch.len(),
            selectors = state.registry.selector_count(),
            "cut batch committed"
        );

        Ok(CutReceipt {
            batch_id,
            operations: batch,
        })
    }

    #[instrument(skip(self), fields(caller = %caller, new_authority = %new_authority))]
    async fn transfer_authority(
        &self,
        caller: Address,
        new_authority: Address,
    ) -> Result<(), GateError> {
        let mut state = self.state.write().await;

        if caller != state.authority {
            warn!(caller = %caller, "unauthorized authority transfer");
            self.stats.write().await.rejected_submissions += 1;
            return Err(GateError::Unauthorized { caller });
        }
        if new_authority.is_zero() {
            return Err(GateError::NullAuthority);
        }

        let previous = state.authority;
        state.authority = new_authority;
        self.events
            .authority_transferred(&AuthorityTransferredPayload {
                previous,
                new_authority,
            });
        info!(previous = %previous, "authority transferred");
        Ok(())
    }

    async fn authority(&self) -> Address {
        self.state.read().await.authority
    }
}

// =============================================================================
// DISPATCHER (call router)
// =============================================================================

#[async_trait]
impl<H: ModuleHost, E: CutEventSink> Dispatcher for FacetCoreService<H, E> {
    #[instrument(skip(self, payload), fields(caller = %caller, selector = %selector))]
    async fn dispatch(
        &self,
        caller: Address,
        selector: Selector,
        payload: Bytes,
    ) -> Result<Bytes, DispatchError> {
        let mut state = self.state.write().await;

        let Some(module) = state.registry.resolve(selector) else {
            debug!("selector unmapped");
            self.note_dispatch_failure().await;
            return Err(DispatchError::FunctionNotFound(selector));
        };

        let Some(logic) = self.host.logic(module) else {
            warn!(module = %module, "mapped module has no code");
            self.note_dispatch_failure().await;
            return Err(DispatchError::ModuleHasNoCode(module));
        };

        // The module runs against a snapshot; its effects become visible
        // only if it succeeds, so a failing call unwinds completely.
        let mut scratch = state.arena.clone();
        let mut ctx = CallContext::new(self.config.core_address, caller, module, selector, &mut scratch);

        match logic.invoke(&mut ctx, payload.as_slice()) {
            Ok(output) => {
                drop(ctx);
                state.arena = scratch;
                self.stats.write().await.dispatches_executed += 1;
                debug!(module = %module, out_len = output.len(), "dispatch completed");
                Ok(output)
            }
            Err(err) => {
                debug!(module = %module, error = %err, "dispatch failed");
                self.note_dispatch_failure().await;
                // Propagated verbatim; the router never rewraps.
                Err(DispatchError::Module(err))
            }
        }
    }

    async fn resolve(&self, selector: Selector) -> Option<Address> {
        self.state.read().await.registry.resolve(selector)
    }
}

// =============================================================================
// LOUPE (introspection)
// =============================================================================

#[async_trait]
impl<H: ModuleHost, E: CutEventSink> Loupe for FacetCoreService<H, E> {
    async fn facet_addresses(&self) -> Vec<Address> {
        self.state.read().await.registry.facet_addresses()
    }

    async fn facet_function_selectors(&self, module: Address) -> Vec<Selector> {
        self.state.read().await.registry.facet_function_selectors(module)
    }

    async fn facet_address(&self, selector: Selector) -> Option<Address> {
        self.state.read().await.registry.resolve(selector)
    }

    async fn facets(&self) -> Vec<Facet> {
        self.state.read().await.registry.facets().to_vec()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Creates a fully wired in-memory service for tests: empty registry,
/// in-memory module host, recording event sink.
#[must_use]
pub fn create_test_service(
    authority: Address,
) -> FacetCoreService<crate::adapters::InMemoryModuleHost, crate::adapters::RecordingEventSink> {
    let config = ServiceConfig {
        core_address: Address::new([0xCC; 20]),
        ..ServiceConfig::default()
    };
    FacetCoreService::new(
        Arc::new(crate::adapters::InMemoryModuleHost::new()),
        Arc::new(crate::adapters::RecordingEventSink::new()),
        authority,
        config,
    )
}

// =============================================================================
// TESTS
// =============================================================================
