// Domain layer: core models and ports (interfaces). No external services here,
// only the shapes the core logic and adapters agree on.

pub mod model;
pub mod ports;
