//! Renewable and non-renewable supply for the supply-stack chart.

use ev_core::Resolution;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{SeriesPoint, call, call_db, years};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::validation::{require_db_path, require_selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplySource {
    Renewables,
    Nonrenewables,
}

impl SupplySource {
    pub fn label(self) -> &'static str {
        match self {
            SupplySource::Renewables => "Renewables",
            SupplySource::Nonrenewables => "Non-renewables",
        }
    }

    fn operation(self, yearly: bool) -> &'static str {
        match (self, yearly) {
            (SupplySource::Renewables, false) => "get_renewables",
            (SupplySource::Nonrenewables, false) => "get_nonrenewables",
            (SupplySource::Renewables, true) => "get_yearly_renewables",
            (SupplySource::Nonrenewables, true) => "get_yearly_nonrenewables",
        }
    }
}

fn series(
    gateway: &dyn TableGateway,
    source: SupplySource,
    db_path: &str,
    year: Option<i32>,
    resolution: Option<Resolution>,
) -> QueryResult<Vec<SeriesPoint>> {
    let db_path = require_db_path(db_path)?;
    let year = require_selection(year, "year")?;
    let args = match resolution {
        Some(resolution) => json!({
            "dbPath": db_path,
            "year": year,
            "resolution": resolution.hours(),
        }),
        None => json!({ "dbPath": db_path, "year": year }),
    };
    let rows = call(gateway, source.operation(resolution.is_none()), args)?;
    SeriesPoint::from_rows(&rows)
}

pub fn get_renewables(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
    resolution: Resolution,
) -> QueryResult<Vec<SeriesPoint>> {
    series(gateway, SupplySource::Renewables, db_path, year, Some(resolution))
}

pub fn get_nonrenewables(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
    resolution: Resolution,
) -> QueryResult<Vec<SeriesPoint>> {
    series(gateway, SupplySource::Nonrenewables, db_path, year, Some(resolution))
}

/// Whole-year totals; the backend answers with a single `[0, 1)` bucket.
pub fn get_yearly_renewables(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
) -> QueryResult<Vec<SeriesPoint>> {
    series(gateway, SupplySource::Renewables, db_path, year, None)
}

pub fn get_yearly_nonrenewables(
    gateway: &dyn TableGateway,
    db_path: &str,
    year: Option<i32>,
) -> QueryResult<Vec<SeriesPoint>> {
    series(gateway, SupplySource::Nonrenewables, db_path, year, None)
}

/// Supply series at `resolution`, switching to the yearly operations for
/// [`Resolution::Years`].
pub fn get_supply(
    gateway: &dyn TableGateway,
    source: SupplySource,
    db_path: &str,
    year: Option<i32>,
    resolution: Resolution,
) -> QueryResult<Vec<SeriesPoint>> {
    let resolution = (resolution != Resolution::Years).then_some(resolution);
    series(gateway, source, db_path, year, resolution)
}

pub fn get_supply_years(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<i32>> {
    let rows = call_db(gateway, "get_supply_years", db_path)?;
    years(&rows, "year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;

    #[test]
    fn yearly_resolution_uses_yearly_operation() {
        let gw = MemoryGateway::new()
            .with_rows("get_yearly_renewables", vec![])
            .with_rows("get_nonrenewables", vec![]);
        get_supply(&gw, SupplySource::Renewables, "/a.duckdb", Some(2030), Resolution::Years)
            .unwrap();
        get_supply(&gw, SupplySource::Nonrenewables, "/a.duckdb", Some(2030), Resolution::Days)
            .unwrap();
        let ops: Vec<String> = gw.calls().into_iter().map(|c| c.operation).collect();
        assert_eq!(ops, ["get_yearly_renewables", "get_nonrenewables"]);
        assert!(gw.calls()[0].args.get("resolution").is_none());
        assert_eq!(gw.calls()[1].args["resolution"], 24);
    }
}
