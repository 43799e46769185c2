//! # Domain Services
//!
//! Pure, deterministic derivation functions: call-selector and storage
//! namespace-key computation. No I/O, no async, no side effects.

use crate::domain::value_objects::{Hash, NamespaceKey, Selector};
use sha3::{Digest, Keccak256};

// =============================================================================
// HASHING
// =============================================================================

/// Computes the Keccak-256 digest of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Hash::new(bytes)
}

// =============================================================================
// SELECTOR DERIVATION
// =============================================================================

/// Derives the 4-byte call selector from a canonical function signature.
///
/// The canonical signature is `name(type1,type2,...)` with no spaces and
/// no parameter names; the selector is the first four bytes of its
/// Keccak-256 digest.
#[must_use]
pub fn selector_from_signature(signature: &str) -> Selector {
    let digest = keccak256(signature.as_bytes());
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&digest.as_bytes()[..4]);
    Selector::new(bytes)
}

// =============================================================================
// NAMESPACE KEY DERIVATION
// =============================================================================

/// Derives a module's storage namespace key from its namespace string.
///
/// Namespace strings are constants chosen per module (conventionally
/// reverse-domain, e.g. `"facet.core.exchange.orderbook"`). Hashing them
/// yields globally unique, collision-resistant partition keys, so
/// unrelated modules can safely share one storage arena.
#[must_use]
pub fn namespace_key(namespace: &str) -> NamespaceKey {
    NamespaceKey::from(keccak256(namespace.as_bytes()))
}

// =============================================================================
// TESTS
// =============================================================================
