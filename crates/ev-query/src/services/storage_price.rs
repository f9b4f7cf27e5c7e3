//! Storage prices for short-term, long-term or both storage kinds.

use ev_core::{Resolution, StorageType};
use serde_json::json;

use super::{MetadataScope, SeriesPoint, call, call_db, years};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::validation::{require_db_path, require_selection};

pub fn get_storage_price_resolution(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
    resolution: Resolution,
    storage_type: StorageType,
    carrier: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<SeriesPoint>> {
    let db_path = require_db_path(db_path)?;
    let year = require_selection(year, "year")?;
    let mut args = json!({
        "dbPath": db_path,
        "year": year,
        "resolution": resolution.hours(),
        "storageType": storage_type.as_str(),
        "carrier": carrier,
    });
    scope.extend(&mut args);
    let rows = call(gateway, "get_storage_price_resolution", args)?;
    SeriesPoint::from_rows(&rows)
}

pub fn get_storage_years(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<i32>> {
    let rows = call_db(gateway, "get_storage_years", db_path)?;
    years(&rows, "year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;

    #[test]
    fn passes_storage_type_name() {
        let gw = MemoryGateway::new().with_rows("get_storage_price_resolution", vec![]);
        let points = get_storage_price_resolution(
            &gw,
            "/a.duckdb",
            Some(2050),
            Resolution::Days,
            StorageType::LongTerm,
            "all",
            &MetadataScope::default(),
        )
        .unwrap();
        assert!(points.is_empty());
        assert_eq!(gw.calls()[0].args["storageType"], "long-term");
        assert_eq!(gw.calls()[0].args["resolution"], 24);
    }
}
