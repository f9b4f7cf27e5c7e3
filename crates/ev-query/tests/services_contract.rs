//! Argument bags sent to the backend by each service.

use ev_core::{MetadataFilters, Resolution, StorageType};
use ev_query::services::{capacity, metadata, storage_price, supply, system_cost};
use ev_query::{MemoryGateway, MetadataScope, QueryError, Row};

#[test]
fn every_service_sends_the_db_path() {
    let gw = MemoryGateway::new()
        .with_rows("get_assets", vec![Row::new().with("asset", "wind_1")])
        .with_rows("get_tables", vec![Row::new().with("name", "asset")])
        .with_rows("get_supply_years", vec![Row::new().with("year", 2030)])
        .with_rows("get_storage_years", vec![Row::new().with("year", 2050)]);

    assert_eq!(metadata::get_assets(&gw, "/a.duckdb").unwrap(), ["wind_1"]);
    assert_eq!(metadata::get_tables(&gw, "/a.duckdb").unwrap(), ["asset"]);
    assert_eq!(supply::get_supply_years(&gw, "/a.duckdb").unwrap(), [2030]);
    assert_eq!(storage_price::get_storage_years(&gw, "/a.duckdb").unwrap(), [2050]);

    for call in gw.calls() {
        assert_eq!(call.args["dbPath"], "/a.duckdb", "{}", call.operation);
    }
}

#[test]
fn filters_and_breakdown_reach_the_backend() {
    let gw = MemoryGateway::new().with_rows("get_storage_price_resolution", vec![]);
    let mut filters = MetadataFilters::new();
    filters.toggle(3, 10);

    storage_price::get_storage_price_resolution(
        &gw,
        "/a.duckdb",
        Some(2030),
        Resolution::Months,
        StorageType::Both,
        "all",
        &MetadataScope::new(&filters, &[5]),
    )
    .unwrap();

    let args = &gw.calls()[0].args;
    assert_eq!(args["resolution"], 720);
    assert_eq!(args["storageType"], "both");
    assert_eq!(args["filters"]["3"][0], 10);
    assert_eq!(args["grouper"][0], 5);
    assert_eq!(args["enableMetadata"], true);
}

#[test]
fn backend_errors_propagate_unchanged() {
    let gw = MemoryGateway::new().with_failure("get_capacity", "IO Error: file is locked");
    let err = capacity::get_capacity(&gw, "/a.duckdb", Some("wind_1")).unwrap_err();
    assert!(matches!(err, QueryError::Backend { .. }));
    assert!(err.to_string().contains("file is locked"));
}

#[test]
fn malformed_rows_surface_decode_errors() {
    let gw = MemoryGateway::new().with_rows(
        "get_fixed_flow_cost",
        vec![Row::new().with("milestone_year", "soon").with("flow_fixed_cost", 1.0)],
    );
    let err = system_cost::get_fixed_flow_cost(&gw, "/a.duckdb").unwrap_err();
    assert!(matches!(err, QueryError::Decode { .. }));
}
