//! # Domain Invariants
//!
//! Structural invariants that must hold in every committed registry
//! state. The cut processor establishes them transactionally; these
//! checks make them observable for tests and debug assertions.
//!
//! - INVARIANT-1: every selector maps to at most one module (primary
//!   table is the single source of truth).
//! - INVARIANT-2: the facet index lists exactly the modules reachable
//!   through at least one selector, with no duplicates and no empty
//!   entries.
//! - INVARIANT-3: primary table and facet index agree in both
//!   directions.

use crate::domain::registry::FacetRegistry;
use crate::domain::value_objects::{Address, Selector};
use std::collections::HashSet;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A detected breach of a committed-state invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryViolation {
    /// A mapped selector does not appear in its module's facet entry.
    SelectorNotIndexed {
        /// The selector missing from the index.
        selector: Selector,
        /// The module the primary table maps it to.
        module: Address,
    },
    /// A facet entry lists a selector the primary table does not map to
    /// that module.
    IndexedSelectorUnmapped {
        /// The stale selector.
        selector: Selector,
        /// The module whose entry lists it.
        module: Address,
    },
    /// The same module appears in more than one facet entry.
    DuplicateFacet {
        /// The duplicated module.
        module: Address,
    },
    /// A facet entry holds no selectors.
    EmptyFacetEntry {
        /// The module with the empty entry.
        module: Address,
    },
}

/// Result of checking all registry invariants.
#[derive(Clone, Debug, Default)]
pub struct InvariantCheckResult {
    /// Every violation found, in detection order.
    pub violations: Vec<RegistryViolation>,
}

impl InvariantCheckResult {
    /// Returns true if no invariant was violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// Checks every committed-state invariant of a registry.
#[must_use]
pub fn check_registry_invariants(registry: &FacetRegistry) -> InvariantCheckResult {
    let mut result = InvariantCheckResult::default();
    let mut seen_modules = HashSet::new();

    // Index -> table direction.
    for facet in registry.facets() {
        if !seen_modules.insert(facet.module) {
            result
                .violations
                .push(RegistryViolation::DuplicateFacet {
                    module: facet.module,
                });
        }
        if facet.selectors.is_empty() {
            result
                .violations
                .push(RegistryViolation::EmptyFacetEntry {
                    module: facet.module,
                });
        }
        for &selector in &facet.selectors {
            if registry.resolve(selector) != Some(facet.module) {
                result
                    .violations
                    .push(RegistryViolation::IndexedSelectorUnmapped {
                        selector,
                        module: facet.module,
                    });
            }
        }
    }

    // Table -> index direction.
    for (selector, module) in registry.mapped_selectors() {
        let indexed = registry
            .facets()
            .iter()
            .any(|facet| facet.module == module && facet.selectors.contains(&selector));
        if !indexed {
            result
                .violations
                .push(RegistryViolation::SelectorNotIndexed { selector, module });
        }
    }

    result
}

/// Convenience predicate over [`check_registry_invariants`].
#[must_use]
pub fn registry_is_consistent(registry: &FacetRegistry) -> bool {
    check_registry_invariants(registry).is_ok()
}

// =============================================================================
// TESTS
// =============================================================================
