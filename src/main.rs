use clap::Parser;
use geofix::adapters::google::GoogleGeocoder;
use geofix::config::GeocodingConfig;
use geofix::domain::ports::GeocoderPort;
use geofix::utils::{logger, validation::Validate};
use geofix::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting geofix CLI");
    if config.verbose {
        tracing::debug!(latitude = config.latitude, longitude = config.longitude, "CLI input");
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let geocoder = GoogleGeocoder::from_config(&GeocodingConfig {
        api_key: config.api_key.clone(),
        result_type: config.result_type.clone(),
        endpoint: config.endpoint.clone(),
    })?;

    match geocoder
        .reverse_geocode(config.latitude, config.longitude)
        .await
    {
        Ok(address) => {
            println!("country: {}", address.country.as_deref().unwrap_or("-"));
            println!("state:   {}", address.state.as_deref().unwrap_or("-"));
            println!("city:    {}", address.city.as_deref().unwrap_or("-"));
        }
        Err(e) => {
            tracing::error!("Reverse geocoding failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
