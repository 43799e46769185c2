//! # Event Schema
//!
//! Payloads describing committed registry changes, for off-chain
//! observers: indexers, auditors, and upgrade tooling. One event is
//! emitted per committed batch and describes every operation in it;
//! aborted batches emit nothing.

use crate::domain::entities::{CutAction, CutOp};
use crate::domain::value_objects::{Address, Selector};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TOPICS
// =============================================================================

/// Well-known topic names for event sinks that multiplex streams.
pub mod topics {
    /// A cut batch committed.
    pub const CUT_COMMITTED: &str = "facet_core.cut_committed";
    /// The registry authority changed hands.
    pub const AUTHORITY_TRANSFERRED: &str = "facet_core.authority_transferred";
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// One operation of a committed batch, as observers see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutOpRecord {
    /// What the operation did.
    pub action: CutAction,
    /// Target module handle (null for Remove).
    pub module: Address,
    /// The selectors the operation covered, in submission order.
    pub selectors: Vec<Selector>,
}

impl From<&CutOp> for CutOpRecord {
    fn from(op: &CutOp) -> Self {
        Self {
            action: op.action,
            module: op.module,
            selectors: op.selectors.clone(),
        }
    }
}

/// Emitted once per committed cut batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutCommittedPayload {
    /// Identifier assigned to the committed batch.
    pub batch_id: Uuid,
    /// Every operation of the batch, in application order.
    pub operations: Vec<CutOpRecord>,
    /// Init module invoked inside the commit, if any.
    pub init_module: Option<Address>,
}

/// Emitted when the access gate's authority is transferred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityTransferredPayload {
    /// The authority before the transfer.
    pub previous: Address,
    /// The authority after the transfer.
    pub new_authority: Address,
}

// =============================================================================
// TESTS
// =============================================================================
