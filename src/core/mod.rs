pub mod facade;
pub mod gating;
pub mod geo;
pub mod location_request;
pub mod operation;
pub mod region_watch;

pub use crate::domain::model::{
    Address, Authorization, Position, Region, RegionEvent, RegionSignal, UpdateStatus,
};
pub use crate::domain::ports::{GeocoderPort, KeyValueStore, PositioningPort};
pub use crate::utils::error::Result;
