use geofix::domain::ports::GeocoderPort;
use geofix::{
    FacadeConfig, FileKeyValueStore, GeocodeStrategy, GoogleGeocoder, LocationError,
    LocationFacade, Position, SimulatedPositioning, UpdateStatus,
};
use httpmock::prelude::*;
use tempfile::TempDir;
use url::Url;

fn geocoder(server: &MockServer, api_key: Option<&str>, result_type: Option<&str>) -> GoogleGeocoder {
    GoogleGeocoder::new(
        Url::parse(&server.url("/geocode")).unwrap(),
        api_key.map(str::to_string),
        result_type.map(str::to_string),
    )
}

#[tokio::test]
async fn ok_payload_resolves_an_address() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/geocode")
            .query_param("latlng", "37.4224,-122.0842")
            .query_param("key", "test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"long_name": "United States", "short_name": "US", "types": ["country", "political"]},
                        {"long_name": "Illinois", "short_name": "IL", "types": ["administrative_area_level_1", "political"]},
                        {"long_name": "Springfield", "short_name": "Springfield", "types": ["locality", "political"]}
                    ]
                }]
            }));
    });

    let address = geocoder(&server, Some("test-key"), None)
        .reverse_geocode(37.4224, -122.0842)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(address.country.as_deref(), Some("US"));
    assert_eq!(address.state.as_deref(), Some("IL"));
    assert_eq!(address.city.as_deref(), Some("Springfield"));
}

#[tokio::test]
async fn result_type_filter_is_forwarded() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/geocode")
            .query_param("result_type", "locality");
        then.status(200)
            .json_body(serde_json::json!({"status": "OK", "results": []}));
    });

    let address = geocoder(&server, None, Some("locality"))
        .reverse_geocode(1.0, 2.0)
        .await
        .unwrap();

    mock.assert();
    assert!(address.is_empty());
}

#[tokio::test]
async fn zero_results_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geocode");
        then.status(200)
            .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let result = geocoder(&server, None, None).reverse_geocode(0.0, 0.0).await;
    assert!(matches!(
        result,
        Err(LocationError::Provider { status }) if status == "ZERO_RESULTS"
    ));
}

#[tokio::test]
async fn malformed_payload_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geocode");
        then.status(200).body("definitely not json");
    });

    let result = geocoder(&server, None, None).reverse_geocode(0.0, 0.0).await;
    assert!(matches!(
        result,
        Err(LocationError::Provider { status }) if status == "MALFORMED_PAYLOAD"
    ));
}

#[tokio::test]
async fn http_failure_is_a_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geocode");
        then.status(500);
    });

    let result = geocoder(&server, None, None).reverse_geocode(0.0, 0.0).await;
    assert!(matches!(result, Err(LocationError::Transport(_))));
}

#[tokio::test]
async fn facade_chains_update_into_remote_geocode_and_persists_the_address() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geocode");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{
                "address_components": [
                    {"long_name": "Germany", "short_name": "DE", "types": ["country"]},
                    {"long_name": "Stuttgart", "short_name": "S", "types": ["locality"]}
                ]
            }]
        }));
    });

    let dir = TempDir::new().unwrap();
    let platform = SimulatedPositioning::new().with_update_batches(vec![vec![Position {
        latitude: 48.7758,
        longitude: 9.1829,
        timestamp: chrono::Utc::now(),
        horizontal_accuracy_m: 5.0,
    }]]);
    let store = FileKeyValueStore::new(dir.path().join("cache.json"));
    let facade = LocationFacade::new(platform, store, FacadeConfig::default())
        .await
        .unwrap()
        .with_remote_geocoder(geocoder(&server, None, None));

    let outcome = facade.reverse_geocode(GeocodeStrategy::Remote).await.unwrap();

    assert_eq!(outcome.status, UpdateStatus::Ok);
    assert_eq!(outcome.address.country.as_deref(), Some("DE"));
    assert_eq!(outcome.address.city.as_deref(), Some("Stuttgart"));
    assert_eq!(facade.last_address().await, Some(outcome.address));

    use geofix::domain::ports::KeyValueStore;
    let store = FileKeyValueStore::new(dir.path().join("cache.json"));
    assert_eq!(store.get("last_country").await.unwrap().as_deref(), Some("DE"));
    assert_eq!(store.get("last_city").await.unwrap().as_deref(), Some("Stuttgart"));
    assert_eq!(store.get("last_state").await.unwrap().as_deref(), Some(""));
}

#[tokio::test]
async fn remote_strategy_without_a_geocoder_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let platform = SimulatedPositioning::new().with_update_batches(vec![vec![Position {
        latitude: 1.0,
        longitude: 2.0,
        timestamp: chrono::Utc::now(),
        horizontal_accuracy_m: 5.0,
    }]]);
    let store = FileKeyValueStore::new(dir.path().join("cache.json"));
    let facade = LocationFacade::new(platform, store, FacadeConfig::default())
        .await
        .unwrap();

    assert!(matches!(
        facade.reverse_geocode(GeocodeStrategy::Remote).await,
        Err(LocationError::MissingConfig { .. })
    ));
}
