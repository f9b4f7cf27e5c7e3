//! Asset capacity over the milestone years.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{call, years};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::table::Row;
use crate::validation::{require_db_path, require_selection};

/// Capacity of one asset in one milestone year (MW).
///
/// The backend reports `-1` for investment or decommission when the solved
/// values are not in the database; those decode as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPoint {
    pub year: i32,
    pub investment: Option<f64>,
    pub decommission: Option<f64>,
    pub initial_capacity: f64,
    pub final_capacity: f64,
}

fn solved(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v >= 0.0)
}

impl CapacityPoint {
    fn from_row(row: &Row) -> QueryResult<Self> {
        Ok(Self {
            year: row.get_i32("year")?,
            investment: solved(row.get_opt_f64("investment")?),
            decommission: solved(row.get_opt_f64("decommission")?),
            initial_capacity: row.get_opt_f64("initial_capacity")?.unwrap_or(0.0),
            final_capacity: row.get_opt_f64("final_capacity")?.unwrap_or(0.0),
        })
    }
}

pub fn get_capacity(
    gateway: &dyn TableGateway,
    db_path: &str,
    asset: Option<&str>,
) -> QueryResult<Vec<CapacityPoint>> {
    let db_path = require_db_path(db_path)?;
    let asset = require_selection(asset, "asset")?;
    let rows = call(
        gateway,
        "get_capacity",
        json!({ "dbPath": db_path, "assetName": asset }),
    )?;
    let mut points = rows
        .iter()
        .map(CapacityPoint::from_row)
        .collect::<QueryResult<Vec<_>>>()?;
    points.sort_by_key(|p| p.year);
    Ok(points)
}

/// Milestone years in which `asset` has capacity data.
pub fn get_available_years(
    gateway: &dyn TableGateway,
    db_path: &str,
    asset: Option<&str>,
) -> QueryResult<Vec<i32>> {
    let db_path = require_db_path(db_path)?;
    let asset = require_selection(asset, "asset")?;
    let rows = call(
        gateway,
        "get_available_years",
        json!({ "dbPath": db_path, "assetName": asset }),
    )?;
    years(&rows, "year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;

    #[test]
    fn unsolved_values_decode_as_none() {
        let gw = MemoryGateway::new().with_rows(
            "get_capacity",
            vec![
                Row::new()
                    .with("year", 2040)
                    .with("investment", -1.0)
                    .with("decommission", 0.0)
                    .with("initial_capacity", 10.0)
                    .with("final_capacity", 10.0),
                Row::new()
                    .with("year", 2030)
                    .with("investment", 5.0)
                    .with("decommission", -1.0)
                    .with("initial_capacity", 5.0)
                    .with("final_capacity", 10.0),
            ],
        );
        let points = get_capacity(&gw, "/a.duckdb", Some("wind_1")).unwrap();
        assert_eq!(points[0].year, 2030);
        assert_eq!(points[0].investment, Some(5.0));
        assert_eq!(points[0].decommission, None);
        assert_eq!(points[1].investment, None);
        assert_eq!(gw.calls()[0].args["assetName"], "wind_1");
    }

    #[test]
    fn asset_is_required() {
        let gw = MemoryGateway::new();
        let err = get_available_years(&gw, "/a.duckdb", None).unwrap_err();
        assert_eq!(err.to_string(), "No asset selected");
        assert_eq!(gw.call_count(), 0);
    }
}
