use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "geofix")]
#[command(about = "Reverse geocode a coordinate pair via the remote provider")]
pub struct CliConfig {
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: f64,

    #[arg(long, help = "Geocoding provider API key")]
    pub api_key: Option<String>,

    #[arg(long, help = "Restrict results to this type, e.g. locality")]
    pub result_type: Option<String>,

    #[arg(long, help = "Override the provider endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("latitude", self.latitude, -90.0, 90.0)?;
        validation::validate_range("longitude", self.longitude, -180.0, 180.0)?;
        if let Some(endpoint) = &self.endpoint {
            validation::validate_url("endpoint", endpoint)?;
        }
        Ok(())
    }
}
