//! Transportation prices per carrier and flow direction.

use ev_core::{FlowDirection, Resolution};
use serde_json::json;

use super::{SeriesPoint, call, call_db, strings, years};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::validation::{require_db_path, require_selection};

/// Price series of the transport flow limit duals.
///
/// `direction` picks the `max` or `min` dual column.
pub fn get_transportation_price_resolution(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
    carrier: &str,
    resolution: Resolution,
    direction: FlowDirection,
) -> QueryResult<Vec<SeriesPoint>> {
    let db_path = require_db_path(db_path)?;
    let year = require_selection(year, "year")?;
    let args = json!({
        "dbPath": db_path,
        "year": year,
        "carrier": carrier,
        "resolution": resolution.hours(),
        "columnType": direction.as_str(),
    });
    let rows = call(gateway, "get_transportation_price_resolution", args)?;
    SeriesPoint::from_rows(&rows)
}

pub fn get_transportation_years(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<i32>> {
    let rows = call_db(gateway, "get_transportation_years", db_path)?;
    years(&rows, "year")
}

/// Carriers with transport flows, sorted.
pub fn get_transportation_carriers(
    gateway: &dyn TableGateway,
    db_path: &str,
) -> QueryResult<Vec<String>> {
    let rows = call_db(gateway, "get_transportation_carriers", db_path)?;
    let mut carriers = strings(&rows, "carrier")?;
    carriers.sort();
    carriers.dedup();
    Ok(carriers)
}
