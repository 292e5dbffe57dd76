//! End-to-end pipeline runs over snapshot files in a temp dir, a scripted
//! upstream and the in-memory store.

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use vcat_config::RemoteConfig;
use vcat_core::{FallbackTable, Make, VehicleType};
use vcat_source::test_support::ScriptedTransport;
use vcat_source::{DatasetLoader, RemoteClient, RetryPolicy};
use vcat_store::{CatalogStore, MemoryCatalogStore, StoreError};
use vcat_sync::{CatalogPipeline, Origin, RunReport};

const MAKES_URL: &str = "https://vpic.test/makes?format=xml";

fn types_url(make_id: &str) -> String {
    format!("https://vpic.test/types/{make_id}?format=xml")
}

fn makes_xml(makes: &[(&str, &str)]) -> String {
    let body: String = makes
        .iter()
        .map(|(id, name)| {
            format!(
                "<AllVehicleMakes><Make_ID>{id}</Make_ID><Make_Name>{name}</Make_Name></AllVehicleMakes>"
            )
        })
        .collect();
    format!("<Response><Count>{}</Count><Results>{body}</Results></Response>", makes.len())
}

fn types_xml(types: &[(&str, &str)]) -> String {
    let body: String = types
        .iter()
        .map(|(id, name)| {
            format!(
                "<VehicleTypesForMakeIds><VehicleTypeId>{id}</VehicleTypeId><VehicleTypeName>{name}</VehicleTypeName></VehicleTypesForMakeIds>"
            )
        })
        .collect();
    format!("<Response><Results>{body}</Results></Response>")
}

fn write_snapshots(dir: &Path, makes: Option<&str>, types: Option<&str>) {
    if let Some(makes) = makes {
        std::fs::write(dir.join("makes.xml"), makes).unwrap();
    }
    if let Some(types) = types {
        std::fs::write(dir.join("types.xml"), types).unwrap();
    }
}

fn fallback() -> FallbackTable {
    FallbackTable::from_entries([("1".to_string(), vec![VehicleType::new("99", "Fallback")])])
}

fn endpoints() -> RemoteConfig {
    RemoteConfig {
        makes_url: MAKES_URL.to_string(),
        types_url: "https://vpic.test/types".to_string(),
        ..RemoteConfig::default()
    }
}

fn pipeline<S: CatalogStore>(
    dir: &Path,
    store: Arc<S>,
    transport: ScriptedTransport,
) -> CatalogPipeline<S, ScriptedTransport> {
    CatalogPipeline::new(
        store,
        DatasetLoader::new(dir),
        RemoteClient::new(transport, RetryPolicy::immediate()),
    )
    .with_endpoints(endpoints())
    .with_fallback(fallback())
}

fn toyota_car() -> Make {
    Make::draft("1", "Toyota").with_vehicle_types(vec![VehicleType::new("2", "Car")])
}

/// Store whose writes always fail.
struct ReadOnlyStore;

impl CatalogStore for ReadOnlyStore {
    async fn replace_all(&self, _makes: Vec<Make>) -> Result<(), StoreError> {
        Err(StoreError::Write("read-only".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<Make>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_make_id(&self, _make_id: &str) -> Result<Option<Make>, StoreError> {
        Ok(None)
    }

    async fn upsert_one(&self, _make: Make) -> Result<(), StoreError> {
        Err(StoreError::Write("read-only".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bootstrap_commits_snapshot_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota")])),
        Some(&types_xml(&[("2", "Car")])),
    );
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(
        pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()).with_remote_sync(false),
    );

    assert!(pipeline.bootstrap().await.is_none());
    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
}

#[tokio::test]
async fn every_make_receives_the_full_types_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota"), ("2", "Ford"), ("3", "Honda")])),
        Some(&types_xml(&[("2", "Car"), ("3", "Truck")])),
    );
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(
        pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()).with_remote_sync(false),
    );

    pipeline.bootstrap().await;

    let makes = store.find_all().await.unwrap();
    let ids: Vec<&str> = makes.iter().map(|m| m.make_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    for make in &makes {
        assert_eq!(
            make.vehicle_types,
            vec![VehicleType::new("2", "Car"), VehicleType::new("3", "Truck")]
        );
    }
}

#[tokio::test]
async fn malformed_types_snapshot_falls_back_per_make() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota"), ("5", "Kia")])),
        Some("<Response><Results>"),
    );
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(
        pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()).with_remote_sync(false),
    );

    pipeline.bootstrap().await;

    assert_eq!(
        store.find_all().await.unwrap(),
        vec![
            Make::draft("1", "Toyota")
                .with_vehicle_types(vec![VehicleType::new("99", "Fallback")]),
            Make::draft("5", "Kia"),
        ]
    );
}

#[tokio::test]
async fn missing_types_snapshot_falls_back_per_make() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(dir.path(), Some(&makes_xml(&[("1", "Toyota")])), None);
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(
        pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()).with_remote_sync(false),
    );

    pipeline.bootstrap().await;

    let make = store.find_by_make_id("1").await.unwrap().unwrap();
    assert_eq!(make.vehicle_types, vec![VehicleType::new("99", "Fallback")]);
}

#[tokio::test]
async fn bootstrap_replaces_whatever_was_there() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota")])),
        Some(&types_xml(&[("2", "Car")])),
    );
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![
        Make::draft("7", "Stale"),
        Make::draft("8", "Older"),
    ]));
    let pipeline = Arc::new(
        pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()).with_remote_sync(false),
    );

    pipeline.bootstrap().await;

    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
}

#[tokio::test]
async fn makes_snapshot_without_records_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(dir.path(), Some(&makes_xml(&[])), Some(&types_xml(&[("2", "Car")])));
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![Make::draft("7", "Stale")]));
    let pipeline = Arc::new(pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()));

    assert!(pipeline.bootstrap().await.is_none());
    assert_eq!(store.find_all().await.unwrap(), vec![Make::draft("7", "Stale")]);
}

#[tokio::test]
async fn unreadable_makes_snapshot_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![Make::draft("7", "Stale")]));
    let pipeline = Arc::new(pipeline(
        dir.path(),
        Arc::clone(&store),
        ScriptedTransport::new().respond(MAKES_URL, 200, &makes_xml(&[("1", "Toyota")])),
    ));

    assert!(pipeline.bootstrap().await.is_none());
    assert_eq!(store.find_all().await.unwrap(), vec![Make::draft("7", "Stale")]);
    assert_eq!(pipeline.remote().transport().total_calls(), 0);
}

#[tokio::test]
async fn malformed_makes_snapshot_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some("<Response><Results><AllVehicleMakes>"),
        Some(&types_xml(&[("2", "Car")])),
    );
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![Make::draft("7", "Stale")]));
    let pipeline = Arc::new(pipeline(dir.path(), Arc::clone(&store), ScriptedTransport::new()));

    assert!(pipeline.bootstrap().await.is_none());
    assert_eq!(store.find_all().await.unwrap(), vec![Make::draft("7", "Stale")]);
}

#[tokio::test]
async fn failed_commit_schedules_no_sync() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota")])),
        Some(&types_xml(&[("2", "Car")])),
    );
    let pipeline = Arc::new(pipeline(dir.path(), Arc::new(ReadOnlyStore), ScriptedTransport::new()));

    assert!(pipeline.bootstrap().await.is_none());
    assert_eq!(pipeline.remote().transport().total_calls(), 0);
}

// ---------------------------------------------------------------------------
// Bootstrap followed by remote sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bootstrap_schedules_remote_sync_that_overwrites_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota")])),
        Some(&types_xml(&[("2", "Car")])),
    );
    let transport = ScriptedTransport::new()
        .respond(MAKES_URL, 200, &makes_xml(&[("1", "TOYOTA"), ("2", "FORD")]))
        .respond(&types_url("1"), 200, &types_xml(&[("3", "Truck")]))
        .respond(&types_url("2"), 200, &types_xml(&[("5", "Bus")]));
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(pipeline(dir.path(), Arc::clone(&store), transport));

    let background = pipeline.bootstrap().await.expect("sync scheduled");
    let report = background.join().await;

    assert_eq!(
        report,
        Some(RunReport {
            origin: Origin::Remote,
            makes: 2,
            fallbacks: 0,
        })
    );
    assert_eq!(
        store.find_all().await.unwrap(),
        vec![
            Make::draft("1", "TOYOTA").with_vehicle_types(vec![VehicleType::new("3", "Truck")]),
            Make::draft("2", "FORD").with_vehicle_types(vec![VehicleType::new("5", "Bus")]),
        ]
    );
}

#[tokio::test]
async fn failing_makes_endpoint_keeps_bootstrap_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(
        dir.path(),
        Some(&makes_xml(&[("1", "Toyota")])),
        Some(&types_xml(&[("2", "Car")])),
    );
    let transport = ScriptedTransport::new().respond(MAKES_URL, 500, "down");
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = Arc::new(pipeline(dir.path(), Arc::clone(&store), transport));

    let background = pipeline.bootstrap().await.expect("sync scheduled");

    assert_eq!(background.join().await, None);
    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
    assert_eq!(pipeline.remote().transport().call_count(MAKES_URL), 1);
}

// ---------------------------------------------------------------------------
// Remote sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn throttled_types_request_is_retried_until_success() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new()
        .respond(MAKES_URL, 200, &makes_xml(&[("1", "Toyota")]))
        .respond(&types_url("1"), 429, "")
        .respond(&types_url("1"), 429, "")
        .respond(&types_url("1"), 200, &types_xml(&[("2", "Car")]));
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport);

    let report = pipeline.sync().await.unwrap();

    assert_eq!(report.fallbacks, 0);
    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
    assert_eq!(pipeline.remote().transport().call_count(&types_url("1")), 3);
}

#[tokio::test]
async fn exhausted_retries_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new()
        .respond(MAKES_URL, 200, &makes_xml(&[("1", "Toyota")]))
        .respond(&types_url("1"), 429, "")
        .respond(&types_url("1"), 403, "")
        .respond(&types_url("1"), 429, "")
        .respond(&types_url("1"), 200, &types_xml(&[("2", "Car")]));
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport);

    let report = pipeline.sync().await.unwrap();

    assert_eq!(report.fallbacks, 1);
    let make = store.find_by_make_id("1").await.unwrap().unwrap();
    assert_eq!(make.vehicle_types, vec![VehicleType::new("99", "Fallback")]);
    assert_eq!(pipeline.remote().transport().call_count(&types_url("1")), 3);
}

#[tokio::test]
async fn server_error_falls_back_without_retry() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new()
        .respond(MAKES_URL, 200, &makes_xml(&[("1", "Toyota")]))
        .respond(&types_url("1"), 500, "oops");
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport);

    let report = pipeline.sync().await.unwrap();

    assert_eq!(report.fallbacks, 1);
    let make = store.find_by_make_id("1").await.unwrap().unwrap();
    assert_eq!(make.vehicle_types, vec![VehicleType::new("99", "Fallback")]);
    assert_eq!(pipeline.remote().transport().call_count(&types_url("1")), 1);
}

#[tokio::test]
async fn one_failing_make_does_not_affect_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new()
        .respond(MAKES_URL, 200, &makes_xml(&[("2", "Ford"), ("1", "Toyota"), ("3", "Honda")]))
        .respond(&types_url("2"), 200, &types_xml(&[("5", "Bus")]))
        .respond(&types_url("1"), 200, "<Response><Results/></Response>")
        .respond(&types_url("3"), 200, &types_xml(&[("7", "Motorcycle")]));
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport).with_concurrency(2);

    let report = pipeline.sync().await.unwrap();

    assert_eq!(report.makes, 3);
    assert_eq!(report.fallbacks, 1);
    assert_eq!(
        store.find_all().await.unwrap(),
        vec![
            Make::draft("2", "Ford").with_vehicle_types(vec![VehicleType::new("5", "Bus")]),
            Make::draft("1", "Toyota")
                .with_vehicle_types(vec![VehicleType::new("99", "Fallback")]),
            Make::draft("3", "Honda")
                .with_vehicle_types(vec![VehicleType::new("7", "Motorcycle")]),
        ]
    );
}

#[tokio::test]
async fn unreachable_makes_endpoint_keeps_previous_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new().fail(MAKES_URL, "connection refused");
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![toyota_car()]));
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport);

    assert_eq!(pipeline.sync().await, None);
    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
}

#[tokio::test]
async fn malformed_upstream_makes_keeps_previous_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new().respond(MAKES_URL, 200, "<html>maintenance</html>");
    let store = Arc::new(MemoryCatalogStore::with_makes(vec![toyota_car()]));
    let pipeline = pipeline(dir.path(), Arc::clone(&store), transport);

    assert_eq!(pipeline.sync().await, None);
    assert_eq!(store.find_all().await.unwrap(), vec![toyota_car()]);
    assert_eq!(pipeline.remote().transport().total_calls(), 1);
}
