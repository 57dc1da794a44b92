use crate::domain::model::{Authorization, Position, Region, RegionSignal};
use crate::domain::ports::PositioningPort;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scripted positioning backend for tests and offline demos. Each call to
/// `start_updates` replays the next scripted batch of fixes; region watches
/// replay the scripted signals. The adapter records which regions were
/// registered and deregistered so callers can assert on platform traffic.
pub struct SimulatedPositioning {
    enabled: bool,
    authorization: Mutex<Authorization>,
    grant_on_request: Authorization,
    max_monitoring_radius_m: f64,
    update_batches: Mutex<VecDeque<Vec<Position>>>,
    region_signals: Mutex<VecDeque<RegionSignal>>,
    hold_update_stream_open: bool,
    hold_region_stream_open: bool,
    held_update_senders: Mutex<Vec<mpsc::Sender<Position>>>,
    held_region_senders: Mutex<Vec<mpsc::Sender<RegionSignal>>>,
    update_sessions: Mutex<u32>,
    monitored: Mutex<Vec<String>>,
    stopped: Mutex<Vec<String>>,
}

impl SimulatedPositioning {
    pub fn new() -> Self {
        Self {
            enabled: true,
            authorization: Mutex::new(Authorization::Always),
            grant_on_request: Authorization::Always,
            max_monitoring_radius_m: 10_000.0,
            update_batches: Mutex::new(VecDeque::new()),
            region_signals: Mutex::new(VecDeque::new()),
            hold_update_stream_open: false,
            hold_region_stream_open: false,
            held_update_senders: Mutex::new(Vec::new()),
            held_region_senders: Mutex::new(Vec::new()),
            update_sessions: Mutex::new(0),
            monitored: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
        }
    }

    pub fn with_service_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_authorization(self, authorization: Authorization) -> Self {
        *lock(&self.authorization) = authorization;
        self
    }

    /// Authorization the simulated user grants when prompted.
    pub fn with_authorization_grant(mut self, grant: Authorization) -> Self {
        self.grant_on_request = grant;
        self
    }

    /// Queue one batch of fixes per expected `start_updates` call.
    pub fn with_update_batches(self, batches: Vec<Vec<Position>>) -> Self {
        *lock(&self.update_batches) = batches.into();
        self
    }

    /// Keep update streams open after the scripted batch is drained, so a
    /// request without a valid fix hangs instead of failing.
    pub fn with_open_update_stream(mut self) -> Self {
        self.hold_update_stream_open = true;
        self
    }

    pub fn with_region_signals(self, signals: Vec<RegionSignal>) -> Self {
        *lock(&self.region_signals) = signals.into();
        self
    }

    pub fn with_open_region_stream(mut self) -> Self {
        self.hold_region_stream_open = true;
        self
    }

    pub fn with_max_monitoring_radius_m(mut self, radius_m: f64) -> Self {
        self.max_monitoring_radius_m = radius_m;
        self
    }

    pub fn update_sessions(&self) -> u32 {
        *lock(&self.update_sessions)
    }

    pub fn monitored_identifiers(&self) -> Vec<String> {
        lock(&self.monitored).clone()
    }

    pub fn stopped_identifiers(&self) -> Vec<String> {
        lock(&self.stopped).clone()
    }
}

impl Default for SimulatedPositioning {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositioningPort for SimulatedPositioning {
    fn service_enabled(&self) -> bool {
        self.enabled
    }

    fn authorization(&self) -> Authorization {
        *lock(&self.authorization)
    }

    async fn request_authorization(&self) -> Result<Authorization> {
        *lock(&self.authorization) = self.grant_on_request;
        Ok(self.grant_on_request)
    }

    async fn start_updates(&self, _desired_accuracy_m: f64) -> Result<mpsc::Receiver<Position>> {
        *lock(&self.update_sessions) += 1;
        let batch = lock(&self.update_batches).pop_front().unwrap_or_default();
        let (tx, rx) = mpsc::channel(batch.len().max(1));
        for fix in batch {
            let _ = tx.send(fix).await;
        }
        if self.hold_update_stream_open {
            lock(&self.held_update_senders).push(tx);
        }
        Ok(rx)
    }

    fn max_monitoring_radius_m(&self) -> f64 {
        self.max_monitoring_radius_m
    }

    async fn start_monitoring(&self, region: &Region) -> Result<mpsc::Receiver<RegionSignal>> {
        lock(&self.monitored).push(region.identifier.clone());
        let signals: Vec<RegionSignal> = lock(&self.region_signals).drain(..).collect();
        let (tx, rx) = mpsc::channel(signals.len().max(1));
        for signal in signals {
            let _ = tx.send(signal).await;
        }
        if self.hold_region_stream_open {
            lock(&self.held_region_senders).push(tx);
        }
        Ok(rx)
    }

    async fn stop_monitoring(&self, identifier: &str) {
        lock(&self.stopped).push(identifier.to_string());
    }
}
