//! # Ports Layer
//!
//! Boundary interfaces of the facet core. `inbound` is what drives the
//! system; `outbound` is what the system drives.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
