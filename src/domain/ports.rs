use crate::domain::model::{Address, Authorization, Position, Region, RegionSignal};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Seam to the platform positioning backend. The real backend delivers events
/// through callbacks; here each subscription is a channel so the core logic
/// can be driven by fakes in tests.
#[async_trait]
pub trait PositioningPort: Send + Sync {
    fn service_enabled(&self) -> bool;

    fn authorization(&self) -> Authorization;

    /// Prompt the user for authorization and wait for the decision.
    async fn request_authorization(&self) -> Result<Authorization>;

    /// Start continuous position updates. Dropping the receiver stops the
    /// update stream.
    async fn start_updates(&self, desired_accuracy_m: f64) -> Result<mpsc::Receiver<Position>>;

    /// Largest region radius the platform will monitor, in meters.
    fn max_monitoring_radius_m(&self) -> f64;

    /// Register a geofence and receive its enter/exit/failure signals.
    async fn start_monitoring(&self, region: &Region) -> Result<mpsc::Receiver<RegionSignal>>;

    /// Deregister a previously monitored geofence.
    async fn stop_monitoring(&self, identifier: &str);
}

#[async_trait]
impl<P: PositioningPort + ?Sized> PositioningPort for Arc<P> {
    fn service_enabled(&self) -> bool {
        (**self).service_enabled()
    }

    fn authorization(&self) -> Authorization {
        (**self).authorization()
    }

    async fn request_authorization(&self) -> Result<Authorization> {
        (**self).request_authorization().await
    }

    async fn start_updates(&self, desired_accuracy_m: f64) -> Result<mpsc::Receiver<Position>> {
        (**self).start_updates(desired_accuracy_m).await
    }

    fn max_monitoring_radius_m(&self) -> f64 {
        (**self).max_monitoring_radius_m()
    }

    async fn start_monitoring(&self, region: &Region) -> Result<mpsc::Receiver<RegionSignal>> {
        (**self).start_monitoring(region).await
    }

    async fn stop_monitoring(&self, identifier: &str) {
        (**self).stop_monitoring(identifier).await
    }
}

/// Seam to a reverse-geocoding backend, platform-native or remote.
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Address>;
}

/// Persistent scalar storage for the last-known position and address.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
