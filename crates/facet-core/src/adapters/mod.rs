//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the outbound ports: the module host the
//! router resolves executables from, and the event sinks observers plug
//! into. Adapters implement domain ports; the core never depends on a
//! concrete adapter.

pub mod event_sink;
pub mod module_host;

pub use event_sink::*;
pub use module_host::*;
