// Adapters layer: concrete implementations for external systems.

pub mod google;
pub mod simulated;
pub mod store;
