use crate::config::GeocodingConfig;
use crate::domain::model::Address;
use crate::domain::ports::GeocoderPort;
use crate::utils::error::{LocationError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Remote reverse geocoder backed by the Google geocoding HTTP API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    result_type: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(endpoint: Url, api_key: Option<String>, result_type: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            result_type,
        }
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = Url::parse(endpoint).map_err(|e| LocationError::InvalidConfigValue {
            field: "geocoding.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self::new(
            endpoint,
            config.api_key.clone(),
            config.result_type.clone(),
        ))
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("latlng", &format!("{latitude},{longitude}"));
            if let Some(result_type) = &self.result_type {
                query.append_pair("result_type", result_type);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }
}

#[async_trait]
impl GeocoderPort for GoogleGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Address> {
        let url = self.request_url(latitude, longitude);
        tracing::debug!(latitude, longitude, "requesting reverse geocode");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        let payload: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| {
                tracing::debug!(error = %e, "geocoding payload did not parse");
                LocationError::Provider {
                    status: "MALFORMED_PAYLOAD".to_string(),
                }
            })?;

        parse_response(payload)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
struct AddressComponent {
    #[serde(default)]
    long_name: String,
    #[serde(default)]
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Provider statuses other than OK (ZERO_RESULTS, OVER_QUERY_LIMIT,
/// REQUEST_DENIED, INVALID_REQUEST) and any unrecognized string all surface
/// as a provider error carrying the raw status.
fn parse_response(payload: GeocodeResponse) -> Result<Address> {
    match payload.status.as_str() {
        "OK" => Ok(extract_address(&payload.results)),
        status => Err(LocationError::Provider {
            status: status.to_string(),
        }),
    }
}

fn extract_address(results: &[GeocodeResult]) -> Address {
    let mut address = Address::default();
    for result in results {
        for component in &result.address_components {
            let has = |t: &str| component.types.iter().any(|candidate| candidate == t);
            if has("country") {
                address.country = Some(component.short_name.clone());
            } else if has("administrative_area_level_1") {
                address.state = Some(component.short_name.clone());
            } else if has("locality") {
                address.city = Some(component.long_name.clone());
            } else if has("administrative_area_level_2") && address.city.is_none() {
                // locality wins over level 2 when both are present
                address.city = Some(component.long_name.clone());
            }
        }
    }
    address
}
