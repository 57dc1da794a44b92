use crate::core::operation::Lifecycle;
use crate::domain::model::{Authorization, Region, RegionEvent, RegionSignal};
use crate::domain::ports::PositioningPort;
use crate::utils::error::{LocationError, Result};
use tokio::sync::mpsc;

/// One-shot geofence watch. Registers a region with the platform, waits for
/// the first matching enter/exit crossing or a monitoring failure, and always
/// deregisters the region before resolving.
pub struct RegionWatch<'a, P: PositioningPort> {
    platform: &'a P,
    region: Region,
    lifecycle: Lifecycle,
}

impl<'a, P: PositioningPort> RegionWatch<'a, P> {
    pub fn new(platform: &'a P, region: Region) -> Self {
        Self {
            platform,
            region,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Resolves exactly once. Preconditions are checked before the region is
    /// registered, so a rejected watch never touches the platform.
    pub async fn run(mut self) -> Result<RegionEvent> {
        self.lifecycle.start()?;

        if self.platform.authorization() != Authorization::Always {
            self.lifecycle.finish()?;
            return Err(LocationError::MissingAuthorization);
        }

        let max_radius_m = self.platform.max_monitoring_radius_m();
        if self.region.radius_m >= max_radius_m {
            self.lifecycle.finish()?;
            return Err(LocationError::Unsupported {
                reason: format!(
                    "region radius {}m is not below the platform maximum of {}m",
                    self.region.radius_m, max_radius_m
                ),
            });
        }

        let mut signals = self.platform.start_monitoring(&self.region).await?;
        tracing::debug!(identifier = %self.region.identifier, "region registered");

        let outcome = self.await_crossing(&mut signals).await;

        drop(signals);
        self.platform.stop_monitoring(&self.region.identifier).await;
        tracing::debug!(identifier = %self.region.identifier, "region deregistered");

        self.lifecycle.finish()?;
        outcome
    }

    async fn await_crossing(
        &self,
        signals: &mut mpsc::Receiver<RegionSignal>,
    ) -> Result<RegionEvent> {
        while let Some(signal) = signals.recv().await {
            match signal {
                RegionSignal::Entered(id)
                    if id == self.region.identifier && self.region.notify_on_entry =>
                {
                    return Ok(RegionEvent::Entered(self.region.clone()));
                }
                RegionSignal::Exited(id)
                    if id == self.region.identifier && self.region.notify_on_exit =>
                {
                    return Ok(RegionEvent::Exited(self.region.clone()));
                }
                RegionSignal::Failed {
                    identifier,
                    message,
                } if identifier == self.region.identifier => {
                    return Err(LocationError::Platform { message });
                }
                other => {
                    tracing::trace!(?other, "ignoring region signal");
                }
            }
        }

        Err(LocationError::Platform {
            message: "region signal stream closed before a crossing".to_string(),
        })
    }
}
