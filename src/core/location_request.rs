use crate::core::operation::Lifecycle;
use crate::domain::model::{Authorization, Position};
use crate::domain::ports::PositioningPort;
use crate::utils::error::{LocationError, Result};
use chrono::Utc;
use std::time::Duration;

/// Oldest fix age, in seconds, still considered current.
pub const MAX_FIX_AGE_SECS: i64 = 5;

/// One-shot request for a fresh position fix. Subscribes to the platform's
/// continuous updates, filters out stale and invalid candidates, and resolves
/// with the first acceptable fix.
pub struct LocationRequest<'a, P: PositioningPort> {
    platform: &'a P,
    desired_accuracy_m: f64,
    timeout: Option<Duration>,
    lifecycle: Lifecycle,
}

impl<'a, P: PositioningPort> LocationRequest<'a, P> {
    pub fn new(platform: &'a P, desired_accuracy_m: f64, timeout: Option<Duration>) -> Self {
        Self {
            platform,
            desired_accuracy_m,
            timeout,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Resolves exactly once, with a fix or a terminal error.
    pub async fn run(mut self) -> Result<Position> {
        self.lifecycle.start()?;
        let result = match self.timeout {
            Some(deadline) => match tokio::time::timeout(deadline, self.acquire()).await {
                Ok(result) => result,
                Err(_) => Err(LocationError::Timeout {
                    seconds: deadline.as_secs(),
                }),
            },
            None => self.acquire().await,
        };
        self.lifecycle.finish()?;
        result
    }

    async fn acquire(&self) -> Result<Position> {
        self.ensure_authorized().await?;

        let mut updates = self.platform.start_updates(self.desired_accuracy_m).await?;
        while let Some(fix) = updates.recv().await {
            // Absolute age: a future-timestamped fix from a skewed platform
            // clock is just as unusable as a stale one.
            let age_secs = Utc::now().signed_duration_since(fix.timestamp).num_seconds();
            if age_secs.abs() >= MAX_FIX_AGE_SECS {
                tracing::debug!(age_secs, "discarding stale fix");
                continue;
            }
            if fix.horizontal_accuracy_m <= 0.0 {
                tracing::debug!(
                    accuracy_m = fix.horizontal_accuracy_m,
                    "discarding fix with invalid horizontal accuracy"
                );
                continue;
            }
            // Accept the first valid fix; dropping the receiver stops updates.
            return Ok(fix);
        }

        Err(LocationError::Platform {
            message: "position update stream closed before a valid fix arrived".to_string(),
        })
    }

    async fn ensure_authorized(&self) -> Result<()> {
        let mut requested = false;
        loop {
            if !self.platform.service_enabled() {
                return Err(LocationError::ServiceDisabled);
            }
            match self.platform.authorization() {
                Authorization::WhenInUse | Authorization::Always => return Ok(()),
                Authorization::Denied | Authorization::Restricted => {
                    return Err(LocationError::MissingAuthorization)
                }
                Authorization::NotDetermined if !requested => {
                    requested = true;
                    let decision = self.platform.request_authorization().await?;
                    tracing::debug!(?decision, "authorization decision received");
                    // Loop re-checks service state with the fresh decision.
                }
                Authorization::NotDetermined => return Err(LocationError::MissingAuthorization),
            }
        }
    }
}
