use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed position fix; also the shape of the cached last-known value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub horizontal_accuracy_m: f64,
}

/// Reverse-geocoded address components. Absent components stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.state.is_none() && self.city.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    NotDetermined,
    Denied,
    Restricted,
    WhenInUse,
    Always,
}

/// Lifecycle state of an asynchronous operation. Transitions are
/// one-directional: Pending -> Running -> Finished, no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Running,
    Finished,
}

/// A circular geofence. The identifier is derived from the geometry so two
/// registrations of the same circle collide deliberately.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub identifier: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
}

impl Region {
    pub fn circular(
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        notify_on_entry: bool,
        notify_on_exit: bool,
    ) -> Self {
        let identifier = format!("{latitude:.6}:{longitude:.6}:{radius_m:.1}");
        Self {
            identifier,
            latitude,
            longitude,
            radius_m,
            notify_on_entry,
            notify_on_exit,
        }
    }
}

/// Raw region event as delivered by the platform, keyed by region identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSignal {
    Entered(String),
    Exited(String),
    Failed { identifier: String, message: String },
}

/// Resolved outcome of a region watch.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionEvent {
    Entered(Region),
    Exited(Region),
}

/// Gating verdict for a candidate fix. Rejections are statuses, not errors:
/// the request still resolves, the cache is just left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Ok,
    DistanceTooSmall,
    TimeTooSmall,
}

#[derive(Debug, Clone)]
pub struct LocationUpdate {
    pub position: Position,
    pub status: UpdateStatus,
}

/// Which reverse-geocoding backend the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeStrategy {
    Platform,
    Remote,
}

#[derive(Debug, Clone)]
pub struct GeocodeOutcome {
    pub position: Position,
    pub status: UpdateStatus,
    pub address: Address,
}
