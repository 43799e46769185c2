//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for module dispatch and registry upgrades.
//! NO I/O, NO async, NO external services.
//!
//! Adapters and the service layer depend on this module; dependencies
//! never point the other way.

pub mod arena;
pub mod entities;
pub mod invariants;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use arena::*;
pub use entities::*;
pub use invariants::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
