pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{google::GoogleGeocoder, simulated::SimulatedPositioning, store::FileKeyValueStore};
pub use config::FacadeConfig;
pub use core::facade::LocationFacade;
pub use domain::model::{
    Address, Authorization, GeocodeOutcome, GeocodeStrategy, LocationUpdate, Position, Region,
    RegionEvent, RegionSignal, UpdateStatus,
};
pub use utils::error::{LocationError, Result};
