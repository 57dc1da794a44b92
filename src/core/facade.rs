use crate::adapters::google::GoogleGeocoder;
use crate::config::FacadeConfig;
use crate::core::gating;
use crate::core::location_request::LocationRequest;
use crate::core::region_watch::RegionWatch;
use crate::domain::model::{
    Address, GeocodeOutcome, GeocodeStrategy, LocationUpdate, Position, Region, RegionEvent,
    UpdateStatus,
};
use crate::domain::ports::{GeocoderPort, KeyValueStore, PositioningPort};
use crate::utils::error::{LocationError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const LAST_LATITUDE: &str = "last_latitude";
const LAST_LONGITUDE: &str = "last_longitude";
const LAST_UPDATED_AT: &str = "last_updated_at";
const LAST_COUNTRY: &str = "last_country";
const LAST_STATE: &str = "last_state";
const LAST_CITY: &str = "last_city";

#[derive(Debug, Default)]
struct Cache {
    position: Option<Position>,
    address: Option<Address>,
    last_update_at: Option<DateTime<Utc>>,
}

/// Front door to the location stack. Owns the cached last-known position and
/// address, serializes concurrent location requests, and chains updates into
/// reverse geocoding. Construct one per session and share it by reference;
/// there is no global instance.
pub struct LocationFacade<P: PositioningPort, S: KeyValueStore> {
    platform: P,
    store: S,
    config: FacadeConfig,
    platform_geocoder: Option<Arc<dyn GeocoderPort>>,
    remote_geocoder: Option<GoogleGeocoder>,
    cache: Mutex<Cache>,
    // Fair async mutex: waiters acquire in submission order, so concurrent
    // update_location calls run one at a time, FIFO.
    update_queue: Mutex<()>,
    active_regions: Mutex<HashSet<String>>,
    updates: broadcast::Sender<Position>,
}

impl<P: PositioningPort, S: KeyValueStore> LocationFacade<P, S> {
    pub async fn new(platform: P, store: S, config: FacadeConfig) -> Result<Self> {
        let (updates, _) = broadcast::channel(16);
        let facade = Self {
            platform,
            store,
            config,
            platform_geocoder: None,
            remote_geocoder: None,
            cache: Mutex::new(Cache::default()),
            update_queue: Mutex::new(()),
            active_regions: Mutex::new(HashSet::new()),
            updates,
        };
        if facade.config.positioning.seed_from_last_known {
            facade.seed_cache().await?;
        }
        Ok(facade)
    }

    pub fn with_platform_geocoder(mut self, geocoder: Arc<dyn GeocoderPort>) -> Self {
        self.platform_geocoder = Some(geocoder);
        self
    }

    pub fn with_remote_geocoder(mut self, geocoder: GoogleGeocoder) -> Self {
        self.remote_geocoder = Some(geocoder);
        self
    }

    pub async fn last_position(&self) -> Option<Position> {
        self.cache.lock().await.position
    }

    pub async fn last_address(&self) -> Option<Address> {
        self.cache.lock().await.address.clone()
    }

    /// Subscribe to "location updated" notifications, emitted once per
    /// accepted (non-gated) update.
    pub fn subscribe(&self) -> broadcast::Receiver<Position> {
        self.updates.subscribe()
    }

    /// Request one fresh fix and run it through the gating policy. Gated
    /// candidates still resolve, with the verdict in `status`; only an `Ok`
    /// verdict touches the cache, the store, and the notification channel.
    pub async fn update_location(&self) -> Result<LocationUpdate> {
        let _serialized = self.update_queue.lock().await;

        let request = LocationRequest::new(
            &self.platform,
            self.config.positioning.desired_accuracy_m,
            self.config.positioning.request_timeout(),
        );
        let position = request.run().await?;

        let now = Utc::now();
        let (cached_position, last_update_at) = {
            let cache = self.cache.lock().await;
            (cache.position, cache.last_update_at)
        };
        let status = gating::evaluate(
            cached_position.as_ref(),
            last_update_at,
            &position,
            self.config.positioning.distance_threshold_m,
            self.config.positioning.time_threshold_secs,
            now,
        );

        match status {
            UpdateStatus::Ok => {
                // Persist before touching the cache so a store failure never
                // leaves the in-memory state ahead of the persisted state.
                self.persist_position(&position, now).await?;
                {
                    let mut cache = self.cache.lock().await;
                    cache.position = Some(position);
                    cache.last_update_at = Some(now);
                }
                let _ = self.updates.send(position);
                tracing::info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    "location updated"
                );
            }
            _ => {
                tracing::debug!(?status, "update gated, cache untouched");
            }
        }

        Ok(LocationUpdate { position, status })
    }

    /// `update_location` chained into geocoder selection. The address cache
    /// is updated and persisted only when the geocoder succeeds.
    pub async fn reverse_geocode(&self, strategy: GeocodeStrategy) -> Result<GeocodeOutcome> {
        let update = self.update_location().await?;
        let position = update.position;

        let address = match strategy {
            GeocodeStrategy::Platform => {
                let geocoder =
                    self.platform_geocoder
                        .as_ref()
                        .ok_or_else(|| LocationError::Unsupported {
                            reason: "no platform geocoder attached".to_string(),
                        })?;
                geocoder
                    .reverse_geocode(position.latitude, position.longitude)
                    .await?
            }
            GeocodeStrategy::Remote => {
                let geocoder =
                    self.remote_geocoder
                        .as_ref()
                        .ok_or_else(|| LocationError::MissingConfig {
                            field: "geocoding".to_string(),
                        })?;
                geocoder
                    .reverse_geocode(position.latitude, position.longitude)
                    .await?
            }
        };

        self.persist_address(&address).await?;
        {
            let mut cache = self.cache.lock().await;
            cache.address = Some(address.clone());
        }

        Ok(GeocodeOutcome {
            position,
            status: update.status,
            address,
        })
    }

    /// Watch a circular region for its first enter/exit crossing. A second
    /// watch on the same geometry while one is pending is rejected rather
    /// than silently replacing the first.
    pub async fn monitor_region(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        notify_on_entry: bool,
        notify_on_exit: bool,
    ) -> Result<RegionEvent> {
        let region = Region::circular(latitude, longitude, radius_m, notify_on_entry, notify_on_exit);

        {
            let mut active = self.active_regions.lock().await;
            if !active.insert(region.identifier.clone()) {
                return Err(LocationError::DuplicateRegion {
                    identifier: region.identifier,
                });
            }
        }

        let identifier = region.identifier.clone();
        let outcome = RegionWatch::new(&self.platform, region).run().await;
        self.active_regions.lock().await.remove(&identifier);
        outcome
    }

    async fn seed_cache(&self) -> Result<()> {
        let latitude = self.store.get(LAST_LATITUDE).await?;
        let longitude = self.store.get(LAST_LONGITUDE).await?;
        let updated_at = self.store.get(LAST_UPDATED_AT).await?;

        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            let (Ok(latitude), Ok(longitude)) =
                (latitude.parse::<f64>(), longitude.parse::<f64>())
            else {
                tracing::warn!("ignoring malformed cached coordinates");
                return Ok(());
            };
            let last_update_at = updated_at
                .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
                .map(|t| t.with_timezone(&Utc));
            let position = Position {
                latitude,
                longitude,
                timestamp: last_update_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                horizontal_accuracy_m: 0.0,
            };
            let mut cache = self.cache.lock().await;
            cache.position = Some(position);
            cache.last_update_at = last_update_at;
            tracing::debug!(latitude, longitude, "seeded position from last known");
        }

        let address = Address {
            country: non_empty(self.store.get(LAST_COUNTRY).await?),
            state: non_empty(self.store.get(LAST_STATE).await?),
            city: non_empty(self.store.get(LAST_CITY).await?),
        };
        if !address.is_empty() {
            self.cache.lock().await.address = Some(address);
        }

        Ok(())
    }

    async fn persist_position(&self, position: &Position, updated_at: DateTime<Utc>) -> Result<()> {
        self.store
            .set(LAST_LATITUDE, &position.latitude.to_string())
            .await?;
        self.store
            .set(LAST_LONGITUDE, &position.longitude.to_string())
            .await?;
        self.store
            .set(LAST_UPDATED_AT, &updated_at.to_rfc3339())
            .await?;
        Ok(())
    }

    async fn persist_address(&self, address: &Address) -> Result<()> {
        self.store
            .set(LAST_COUNTRY, address.country.as_deref().unwrap_or(""))
            .await?;
        self.store
            .set(LAST_STATE, address.state.as_deref().unwrap_or(""))
            .await?;
        self.store
            .set(LAST_CITY, address.city.as_deref().unwrap_or(""))
            .await?;
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
