//! Production prices (duals of the production capacity constraints).

use ev_core::Resolution;
use serde_json::json;

use super::{MetadataScope, SeriesPoint, call, call_db, years};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::validation::{require_db_path, require_selection};

/// Price series for one year, bucketed at `resolution`.
pub fn get_production_price_resolution(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
    resolution: Resolution,
    carrier: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<SeriesPoint>> {
    let db_path = require_db_path(db_path)?;
    let year = require_selection(year, "year")?;
    let mut args = json!({
        "dbPath": db_path,
        "year": year,
        "resolution": resolution.hours(),
        "carrier": carrier,
    });
    scope.extend(&mut args);
    let rows = call(gateway, "get_production_price_resolution", args)?;
    SeriesPoint::from_rows(&rows)
}

pub fn get_production_years(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<i32>> {
    let rows = call_db(gateway, "get_production_years", db_path)?;
    years(&rows, "year")
}
