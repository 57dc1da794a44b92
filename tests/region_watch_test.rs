use geofix::{
    Authorization, FacadeConfig, FileKeyValueStore, LocationError, LocationFacade, Region,
    RegionEvent, RegionSignal, SimulatedPositioning,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn facade(
    platform: Arc<SimulatedPositioning>,
    dir: &TempDir,
) -> LocationFacade<Arc<SimulatedPositioning>, FileKeyValueStore> {
    let store = FileKeyValueStore::new(dir.path().join("cache.json"));
    LocationFacade::new(platform, store, FacadeConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn entry_crossing_resolves_and_deregisters() {
    let region = Region::circular(37.0, -122.0, 100.0, true, false);
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(
        SimulatedPositioning::new()
            .with_region_signals(vec![RegionSignal::Entered(region.identifier.clone())]),
    );
    let facade = facade(platform.clone(), &dir).await;

    let event = facade
        .monitor_region(37.0, -122.0, 100.0, true, false)
        .await
        .unwrap();

    assert_eq!(event, RegionEvent::Entered(region.clone()));
    assert_eq!(platform.monitored_identifiers(), vec![region.identifier.clone()]);
    assert_eq!(platform.stopped_identifiers(), vec![region.identifier]);
}

#[tokio::test]
async fn exit_only_watch_ignores_the_entry_signal() {
    let region = Region::circular(37.0, -122.0, 100.0, false, true);
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(SimulatedPositioning::new().with_region_signals(vec![
        RegionSignal::Entered(region.identifier.clone()),
        RegionSignal::Exited(region.identifier.clone()),
    ]));
    let facade = facade(platform, &dir).await;

    let event = facade
        .monitor_region(37.0, -122.0, 100.0, false, true)
        .await
        .unwrap();

    assert_eq!(event, RegionEvent::Exited(region));
}

#[tokio::test]
async fn signals_for_other_regions_are_ignored() {
    let region = Region::circular(37.0, -122.0, 100.0, true, false);
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(SimulatedPositioning::new().with_region_signals(vec![
        RegionSignal::Entered("somewhere-else".to_string()),
        RegionSignal::Entered(region.identifier.clone()),
    ]));
    let facade = facade(platform, &dir).await;

    let event = facade
        .monitor_region(37.0, -122.0, 100.0, true, false)
        .await
        .unwrap();

    assert_eq!(event, RegionEvent::Entered(region));
}

#[tokio::test]
async fn radius_at_the_platform_maximum_is_unsupported_without_registering() {
    let dir = TempDir::new().unwrap();
    let platform =
        Arc::new(SimulatedPositioning::new().with_max_monitoring_radius_m(10_000.0));
    let facade = facade(platform.clone(), &dir).await;

    let result = facade
        .monitor_region(37.0, -122.0, 10_000.0, true, true)
        .await;

    assert!(matches!(result, Err(LocationError::Unsupported { .. })));
    assert!(platform.monitored_identifiers().is_empty());
}

#[tokio::test]
async fn region_watch_requires_always_authorization() {
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(
        SimulatedPositioning::new().with_authorization(Authorization::WhenInUse),
    );
    let facade = facade(platform.clone(), &dir).await;

    let result = facade.monitor_region(37.0, -122.0, 100.0, true, true).await;

    assert!(matches!(result, Err(LocationError::MissingAuthorization)));
    assert!(platform.monitored_identifiers().is_empty());
}

#[tokio::test]
async fn monitoring_failure_resolves_with_a_platform_error_and_deregisters() {
    let region = Region::circular(37.0, -122.0, 100.0, true, true);
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(SimulatedPositioning::new().with_region_signals(vec![
        RegionSignal::Failed {
            identifier: region.identifier.clone(),
            message: "monitoring unavailable".to_string(),
        },
    ]));
    let facade = facade(platform.clone(), &dir).await;

    let result = facade.monitor_region(37.0, -122.0, 100.0, true, true).await;

    assert!(matches!(
        result,
        Err(LocationError::Platform { message }) if message == "monitoring unavailable"
    ));
    assert_eq!(platform.stopped_identifiers(), vec![region.identifier]);
}

#[tokio::test]
async fn a_second_watch_on_the_same_region_is_rejected_while_pending() {
    let dir = TempDir::new().unwrap();
    let platform = Arc::new(SimulatedPositioning::new().with_open_region_stream());
    let facade = Arc::new(facade(platform, &dir).await);

    let pending = {
        let facade = facade.clone();
        tokio::spawn(async move {
            facade
                .monitor_region(37.0, -122.0, 100.0, true, false)
                .await
        })
    };
    // let the first watch register
    tokio::time::sleep(Duration::from_millis(50)).await;

    let duplicate = facade
        .monitor_region(37.0, -122.0, 100.0, true, false)
        .await;
    assert!(matches!(
        duplicate,
        Err(LocationError::DuplicateRegion { identifier }) if identifier == "37.000000:-122.000000:100.0"
    ));

    pending.abort();
}
