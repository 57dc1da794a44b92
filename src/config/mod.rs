#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{LocationError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacadeConfig {
    pub positioning: PositioningConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositioningConfig {
    pub desired_accuracy_m: f64,
    /// Gate updates closer than this to the cached position. 0 disables.
    #[serde(default)]
    pub distance_threshold_m: f64,
    /// Gate updates arriving sooner than this after the last one. 0 disables.
    #[serde(default)]
    pub time_threshold_secs: u64,
    #[serde(default)]
    pub seed_from_last_known: bool,
    /// Deadline for a pending location request. Absent means no deadline.
    pub request_timeout_secs: Option<u64>,
}

impl PositioningConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodingConfig {
    pub api_key: Option<String>,
    /// Provider result-type filter, e.g. "locality".
    pub result_type: Option<String>,
    /// Provider endpoint override; defaults to the Google geocoding API.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub path: String,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            positioning: PositioningConfig {
                desired_accuracy_m: 10.0,
                distance_threshold_m: 0.0,
                time_threshold_secs: 0,
                seed_from_last_known: false,
                request_timeout_secs: None,
            },
            geocoding: GeocodingConfig::default(),
            cache: CacheConfig {
                path: "geofix-cache.json".to_string(),
            },
        }
    }
}

impl FacadeConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LocationError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LocationError::InvalidConfigValue {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for FacadeConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive(
            "positioning.desired_accuracy_m",
            self.positioning.desired_accuracy_m,
        )?;
        validation::validate_non_negative(
            "positioning.distance_threshold_m",
            self.positioning.distance_threshold_m,
        )?;
        if let Some(endpoint) = &self.geocoding.endpoint {
            validation::validate_url("geocoding.endpoint", endpoint)?;
        }
        if let Some(result_type) = &self.geocoding.result_type {
            validation::validate_non_empty_string("geocoding.result_type", result_type)?;
        }
        validation::validate_path("cache.path", &self.cache.path)?;
        Ok(())
    }
}
