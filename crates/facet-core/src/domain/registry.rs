//! # Registry Store
//!
//! The authoritative mapping from call selectors to the module currently
//! responsible for them, plus the derived reverse index used by the
//! loupe. Both structures are updated within the same step, so they can
//! never disagree in a committed state.
//!
//! Batch application is copy-validate-swap: [`FacetRegistry::apply_batch`]
//! never mutates the receiver. It validates and applies every operation
//! left-to-right on a working copy, so an operation later in the batch
//! sees the effects of earlier operations, and the first violation
//! discards the copy with nothing retained.

use crate::domain::entities::{CutAction, CutOp, Facet};
use crate::domain::value_objects::{Address, Selector};
use crate::errors::CutError;
use std::collections::HashMap;

/// Selector routing table plus ordered facet index.
///
/// Invariants in every committed state:
/// - each selector maps to at most one module;
/// - the facet index lists exactly the modules reachable through at
///   least one selector, in stable first-registration order;
/// - a module fully removed and later re-added reappears at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetRegistry {
    /// Primary table: selector -> module.
    selectors: HashMap<Selector, Address>,
    /// Derived reverse index in first-registration order.
    facets: Vec<Facet>,
}

impl FacetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Lookups (loupe)
    // -------------------------------------------------------------------------

    /// Resolves a selector against the committed table.
    #[must_use]
    pub fn resolve(&self, selector: Selector) -> Option<Address> {
        self.selectors.get(&selector).copied()
    }

    /// Distinct modules currently reachable through at least one selector,
    /// in stable first-registration order.
    #[must_use]
    pub fn facet_addresses(&self) -> Vec<Address> {
        self.facets.iter().map(|facet| facet.module).collect()
    }

    /// Selectors currently mapped to the given module. Empty if the module
    /// is not reachable.
    #[must_use]
    pub fn facet_function_selectors(&self, module: Address) -> Vec<Selector> {
        self.facets
            .iter()
            .find(|facet| facet.module == module)
            .map(|facet| facet.selectors.clone())
            .unwrap_or_default()
    }

    /// The combined facet view: every reachable module with its selectors.
    #[must_use]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Number of mapped selectors.
    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.selectors.len()
    }

    /// Every mapped `(selector, module)` pair in the primary table.
    /// Order is unspecified.
    #[must_use]
    pub fn mapped_selectors(&self) -> Vec<(Selector, Address)> {
        self.selectors
            .iter()
            .map(|(selector, module)| (*selector, *module))
            .collect()
    }

    /// Returns true if no selector is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    // -------------------------------------------------------------------------
    // Batch application
    // -------------------------------------------------------------------------

    /// Validates and applies a cut batch against a working copy.
    ///
    /// Operations are processed left-to-right; later operations see the
    /// effects of earlier ones. On the first violation the whole batch
    /// aborts: the error names the offending operation's index, selector,
    /// and action, and the receiver is untouched.
    ///
    /// `has_code` reports whether a module handle is known to contain
    /// executable code; Add and Replace targets must pass it.
    ///
    /// # Errors
    ///
    /// Any [`CutError`] batch-validation variant.
    pub fn apply_batch<F>(&self, batch: &[CutOp], has_code: F) -> Result<Self, CutError>
    where
        F: Fn(Address) -> bool,
    {
        if batch.is_empty() {
            return Err(CutError::EmptyBatch);
        }

        let mut next = self.clone();
        for (index, op) in batch.iter().enumerate() {
            next.apply_op(index, op, &has_code)?;
        }
        Ok(next)
    }

    /// Applies one operation to the working view.
    fn apply_op<F>(&mut self, index: usize, op: &CutOp, has_code: &F) -> Result<(), CutError>
    where
        F: Fn(Address) -> bool,
    {
        if op.selectors.is_empty() {
            return Err(CutError::EmptySelectorList { index });
        }

        match op.action {
            CutAction::Add => {
                if !has_code(op.module) {
                    return Err(CutError::ModuleHasNoCode {
                        index,
                        module: op.module,
                        action: CutAction::Add,
                    });
                }
                for &selector in &op.selectors {
                    if self.selectors.contains_key(&selector) {
                        return Err(CutError::SelectorAlreadyMapped { index, selector });
                    }
                    self.map(selector, op.module);
                }
            }
            CutAction::Replace => {
                if !has_code(op.module) {
                    return Err(CutError::ModuleHasNoCode {
                        index,
                        module: op.module,
                        action: CutAction::Replace,
                    });
                }
                for &selector in &op.selectors {
                    match self.selectors.get(&selector).copied() {
                        None => {
                            return Err(CutError::SelectorNotMapped {
                                index,
                                selector,
                                action: CutAction::Replace,
                            });
                        }
                        Some(current) if current == op.module => {
                            return Err(CutError::SameModuleReplace {
                                index,
                                selector,
                                module: current,
                            });
                        }
                        Some(current) => {
                            self.unmap(selector, current);
                            self.map(selector, op.module);
                        }
                    }
                }
            }
            CutAction::Remove => {
                if !op.module.is_zero() {
                    return Err(CutError::RemoveTargetMustBeNull {
                        index,
                        module: op.module,
                    });
                }
                for &selector in &op.selectors {
                    match self.selectors.get(&selector).copied() {
                        None => {
                            return Err(CutError::SelectorNotMapped {
                                index,
                                selector,
                                action: CutAction::Remove,
                            });
                        }
                        Some(current) => self.unmap(selector, current),
                    }
                }
            }
        }
        Ok(())
    }

    /// Maps a selector to a module in both structures.
    fn map(&mut self, selector: Selector, module: Address) {
        self.selectors.insert(selector, module);
        if let Some(facet) = self.facets.iter_mut().find(|facet| facet.module == module) {
            facet.selectors.push(selector);
        } else {
            self.facets.push(Facet {
                module,
                selectors: vec![selector],
            });
        }
    }

    /// Unmaps a selector from its current module in both structures.
    ///
    /// A facet entry whose last selector is removed disappears from the
    /// index; re-adding the module later places it at the end again.
    fn unmap(&mut self, selector: Selector, current: Address) {
        self.selectors.remove(&selector);
        if let Some(pos) = self.facets.iter().position(|facet| facet.module == current) {
            self.facets[pos].selectors.retain(|s| *s != selector);
            if self.facets[pos].selectors.is_empty() {
                self.facets.remove(pos);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
