//! Core types and service wiring for the trashday pick-up day lookup.

/// US holiday calendar and the weekly holiday lookup.
pub mod holiday;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Registry for plugging municipality-specific providers into the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Pick-up day names and the holiday schedule adjuster.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;

pub use holiday::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use schedule::*;
pub use service::*;
