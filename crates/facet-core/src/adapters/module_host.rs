//! # Module Host Adapter
//!
//! In-memory module host: modules are plain objects registered against
//! an address, the simulated-dispatcher strategy for a shared execution
//! context. A production embedding would back this with real dynamic
//! code loading; the port surface is identical.

use crate::domain::entities::CallContext;
use crate::domain::value_objects::{Address, Bytes};
use crate::errors::ModuleError;
use crate::ports::outbound::{ModuleHost, ModuleLogic};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

/// Registry of deployed module logic, keyed by handle.
#[derive(Default)]
pub struct InMemoryModuleHost {
    /// Deployed modules.
    modules: RwLock<HashMap<Address, Arc<dyn ModuleLogic>>>,
}

impl InMemoryModuleHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys module logic at a handle. Re-deploying replaces the code;
    /// the registry's routing for the handle is unaffected.
    pub fn register(&self, module: Address, logic: Arc<dyn ModuleLogic>) {
        self.modules.write().unwrap().insert(module, logic);
    }

    /// Deploys a closure as module logic at a handle.
    pub fn register_fn<F>(&self, module: Address, f: F)
    where
        F: Fn(&mut CallContext<'_>, &[u8]) -> Result<Bytes, ModuleError> + Send + Sync + 'static,
    {
        self.register(module, Arc::new(FnModule::new(f)));
    }

    /// Removes the logic at a handle. Returns true if something was
    /// deployed there. Routing entries pointing at the handle survive;
    /// dispatching through them then fails with a has-no-code error.
    pub fn deregister(&self, module: Address) -> bool {
        self.modules.write().unwrap().remove(&module).is_some()
    }

    /// Handles that currently have logic deployed.
    #[must_use]
    pub fn deployed(&self) -> Vec<Address> {
        self.modules.read().unwrap().keys().copied().collect()
    }
}

impl ModuleHost for InMemoryModuleHost {
    fn logic(&self, module: Address) -> Option<Arc<dyn ModuleLogic>> {
        self.modules.read().unwrap().get(&module).cloned()
    }
}

// =============================================================================
// CLOSURE MODULE
// =============================================================================

/// Adapts a closure into [`ModuleLogic`].
pub struct FnModule<F> {
    f: F,
}

impl<F> FnModule<F>
where
    F: Fn(&mut CallContext<'_>, &[u8]) -> Result<Bytes, ModuleError> + Send + Sync,
{
    /// Wraps the closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ModuleLogic for FnModule<F>
where
    F: Fn(&mut CallContext<'_>, &[u8]) -> Result<Bytes, ModuleError> + Send + Sync,
{
    fn invoke(&self, ctx: &mut CallContext<'_>, payload: &[u8]) -> Result<Bytes, ModuleError> {
        (self.f)(ctx, payload)
    }
}

// =============================================================================
// TESTS
// =============================================================================
