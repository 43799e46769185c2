//! # Event Sink Adapters
//!
//! In-process implementations of the cut event sink: a recording sink
//! for tests and auditors, and a tracing sink that renders each payload
//! as one JSON log line.

use crate::events::{topics, AuthorityTransferredPayload, CutCommittedPayload};
use crate::ports::outbound::CutEventSink;
use std::sync::Mutex;
use tracing::info;

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Retains every received event in order.
#[derive(Default)]
pub struct RecordingEventSink {
    cuts: Mutex<Vec<CutCommittedPayload>>,
    transfers: Mutex<Vec<AuthorityTransferredPayload>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cut-committed event received so far.
    #[must_use]
    pub fn cuts(&self) -> Vec<CutCommittedPayload> {
        self.cuts.lock().unwrap().clone()
    }

    /// Every authority-transfer event received so far.
    #[must_use]
    pub fn transfers(&self) -> Vec<AuthorityTransferredPayload> {
        self.transfers.lock().unwrap().clone()
    }
}

impl CutEventSink for RecordingEventSink {
    fn cut_committed(&self, payload: &CutCommittedPayload) {
        self.cuts.lock().unwrap().push(payload.clone());
    }

    fn authority_transferred(&self, payload: &AuthorityTransferredPayload) {
        self.transfers.lock().unwrap().push(payload.clone());
    }
}

// =============================================================================
// TRACING SINK
// =============================================================================

/// Logs each event as a JSON payload on the corresponding topic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CutEventSink for TracingEventSink {
    fn cut_committed(&self, payload: &CutCommittedPayload) {
        let json = serde_json::to_string(payload).unwrap_or_default();
        info!(topic = topics::CUT_COMMITTED, payload = %json, "cut committed");
    }

    fn authority_transferred(&self, payload: &AuthorityTransferredPayload) {
        let json = serde_json::to_string(payload).unwrap_or_default();
        info!(topic = topics::AUTHORITY_TRANSFERRED, payload = %json, "authority transferred");
    }
}

// =============================================================================
// TESTS
// =============================================================================
